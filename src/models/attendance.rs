//! Attendance model.
//!
//! One [`AttendanceRecord`] is returned by the backend per employee for the
//! requested date window. It carries the attendance units, accumulated travel
//! distances and the per-kilometer rates that apply to that employee.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::de::decimal_or_zero;

/// Expense statistics nested inside an attendance record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    /// Reimbursed expenses approved within the period.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub approved_expense: Decimal,
}

/// An employee's attendance summary for one month window.
///
/// Absent or `null` numeric fields read as zero, so a sparse backend payload
/// never fails to deserialize.
///
/// # Example
///
/// ```
/// use field_payroll::models::AttendanceRecord;
/// use rust_decimal::Decimal;
///
/// let json = r#"{
///     "employeeId": 7,
///     "employeeFirstName": "Asha",
///     "employeeLastName": "Rao",
///     "fullDays": 20,
///     "halfDays": 2,
///     "distanceTravelledByCar": 120,
///     "pricePerKmCar": 8,
///     "statsDto": { "approvedExpense": 500 }
/// }"#;
///
/// let record: AttendanceRecord = serde_json::from_str(json).unwrap();
/// assert_eq!(record.full_days, Decimal::from(20));
/// assert_eq!(record.distance_travelled_by_bike, Decimal::ZERO);
/// assert_eq!(record.approved_expense(), Decimal::from(500));
/// assert_eq!(record.display_name(), "Asha Rao");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// The employee this record belongs to.
    pub employee_id: i64,
    /// The employee's first name, as reported with the attendance log.
    #[serde(default)]
    pub employee_first_name: String,
    /// The employee's last name, as reported with the attendance log.
    #[serde(default)]
    pub employee_last_name: String,
    /// Number of full attendance days in the window.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub full_days: Decimal,
    /// Number of half attendance days in the window.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub half_days: Decimal,
    /// Kilometers travelled by car in the window.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub distance_travelled_by_car: Decimal,
    /// Kilometers travelled by bike in the window.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub distance_travelled_by_bike: Decimal,
    /// Car reimbursement rate per kilometer.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub price_per_km_car: Decimal,
    /// Bike reimbursement rate per kilometer.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub price_per_km_bike: Decimal,
    /// Expense statistics, when the backend includes them.
    #[serde(default, rename = "statsDto")]
    pub stats: Option<AttendanceStats>,
}

impl AttendanceRecord {
    /// Returns the approved expense, or zero when no statistics were sent.
    pub fn approved_expense(&self) -> Decimal {
        self.stats
            .as_ref()
            .map(|s| s.approved_expense)
            .unwrap_or_default()
    }

    /// Returns `"first last"` as shown in the salary listing.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.employee_first_name, self.employee_last_name)
    }
}
