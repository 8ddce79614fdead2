use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::round_currency;
use crate::models::{AttendanceRecord, PayrollBreakdown};

/// One line of the salary listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRow {
    /// The employee the row is for.
    pub employee_id: i64,
    /// `"first last"`.
    pub name: String,
    /// Full attendance days as reported.
    pub full_days: Decimal,
    /// Half attendance days as reported.
    pub half_days: Decimal,
    /// Prorated monthly salary.
    pub base_salary: Decimal,
    /// Car kilometers, rounded.
    pub car_km: Decimal,
    /// Bike kilometers, rounded.
    pub bike_km: Decimal,
    /// Car and bike reimbursement.
    pub travel_allowance: Decimal,
    /// Dearness allowance.
    pub dearness_allowance: Decimal,
    /// Reimbursed expenses.
    pub approved_expense: Decimal,
    /// The payable total.
    pub total_salary: Decimal,
    /// Days still missing their travel distance.
    pub anomaly_count: usize,
}

impl SalaryRow {
    /// Builds the row for `record` from its computed breakdown.
    pub fn new(record: &AttendanceRecord, breakdown: &PayrollBreakdown, anomaly_count: usize) -> Self {
        Self {
            employee_id: record.employee_id,
            name: record.display_name(),
            full_days: record.full_days,
            half_days: record.half_days,
            base_salary: breakdown.base_salary,
            car_km: round_currency(record.distance_travelled_by_car),
            bike_km: round_currency(record.distance_travelled_by_bike),
            travel_allowance: breakdown.travel_allowance,
            dearness_allowance: breakdown.dearness_allowance,
            approved_expense: breakdown.approved_expense,
            total_salary: breakdown.total_salary,
            anomaly_count,
        }
    }

    /// Whether the row has days waiting for distance backfill.
    pub fn has_anomalies(&self) -> bool {
        self.anomaly_count > 0
    }
}
