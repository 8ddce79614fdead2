//! Employee profile model.
//!
//! Profiles are fetched once per session and keyed by employee id. They hold
//! the salary settings the calculator needs: the daily dearness allowance and
//! the full-month salary.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::de::decimal_or_zero;

/// Salary settings for one employee.
///
/// The backend's employee listing uses `id` for the identifier; `employeeId`
/// is accepted as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    /// Unique identifier for the employee.
    #[serde(alias = "id")]
    pub employee_id: i64,
    /// The employee's first name.
    #[serde(default)]
    pub first_name: String,
    /// The employee's last name.
    #[serde(default)]
    pub last_name: String,
    /// Dearness allowance paid per full attendance day.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub dearness_allowance: Decimal,
    /// Salary for a complete calendar month.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub full_month_salary: Decimal,
}

/// Profiles indexed by employee id.
pub type EmployeeProfiles = HashMap<i64, EmployeeProfile>;

impl EmployeeProfile {
    /// A profile with no salary settings, used when the backend has none.
    pub fn unassigned(employee_id: i64) -> Self {
        Self {
            employee_id,
            ..Default::default()
        }
    }

    /// Indexes a profile listing by employee id. Later duplicates win.
    pub fn index(profiles: impl IntoIterator<Item = EmployeeProfile>) -> EmployeeProfiles {
        profiles
            .into_iter()
            .map(|p| (p.employee_id, p))
            .collect()
    }
}
