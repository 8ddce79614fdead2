//! Full salary breakdown for one employee and month.
//!
//! Combines the individual rules into a [`PayrollBreakdown`] and records an
//! audit step per rule. Everything here is a pure function of its inputs.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, AuditStep, AuditTrace, AuditWarning, EmployeeProfile, PayrollBreakdown,
    Period,
};

use super::base_salary::base_salary;
use super::calendar::period_cutoff;
use super::dearness_allowance::dearness_allowance;
use super::rounding::{checked_add, checked_mul, require_non_negative, round_currency};
use super::travel_allowance::travel_allowance;
use super::worked_days::{HALF_DAY_WEIGHT, worked_days};

/// Warning code recorded when no salary profile exists for the employee.
pub const PROFILE_MISSING: &str = "PROFILE_MISSING";
/// Warning code recorded when attendance exceeded the elapsed days.
pub const WORKED_DAYS_CLAMPED: &str = "WORKED_DAYS_CLAMPED";
/// Warning code recorded when the dearness allowance hit its ceiling.
pub const DA_CLAMPED: &str = "DA_CLAMPED";

fn step(
    step_number: u32,
    rule_id: &str,
    rule_name: &str,
    input: serde_json::Value,
    output: serde_json::Value,
    reasoning: String,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: rule_id.to_string(),
        rule_name: rule_name.to_string(),
        input,
        output,
        reasoning,
    }
}

/// Computes the salary breakdown for one attendance record.
///
/// `today` decides the cutoff: a month in progress only counts through
/// yesterday. A missing profile is not an error; the salary settings read as
/// zero and a `PROFILE_MISSING` warning is recorded.
///
/// # Errors
///
/// Returns a validation error for negative inputs, or when the profile
/// belongs to a different employee than the record.
///
/// # Examples
///
/// ```
/// use field_payroll::calculation::calculate_payroll;
/// use field_payroll::models::{AttendanceRecord, AttendanceStats, EmployeeProfile, Period};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let record = AttendanceRecord {
///     employee_id: 7,
///     full_days: Decimal::from(20),
///     half_days: Decimal::from(2),
///     distance_travelled_by_car: Decimal::from(120),
///     distance_travelled_by_bike: Decimal::from(300),
///     price_per_km_car: Decimal::from(8),
///     price_per_km_bike: Decimal::from(3),
///     stats: Some(AttendanceStats { approved_expense: Decimal::from(500) }),
///     ..Default::default()
/// };
/// let profile = EmployeeProfile {
///     employee_id: 7,
///     dearness_allowance: Decimal::from(50),
///     full_month_salary: Decimal::from(62000),
///     ..Default::default()
/// };
/// let period = Period::new(2024, 7).unwrap();
/// let today = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
///
/// let breakdown = calculate_payroll(&record, Some(&profile), period, today).unwrap();
/// assert_eq!(breakdown.total_salary, Decimal::from(45410));
/// ```
pub fn calculate_payroll(
    record: &AttendanceRecord,
    profile: Option<&EmployeeProfile>,
    period: Period,
    today: NaiveDate,
) -> EngineResult<PayrollBreakdown> {
    let mut warnings = Vec::new();
    let mut steps = Vec::new();

    let unassigned;
    let profile = match profile {
        Some(p) if p.employee_id != record.employee_id => {
            return Err(EngineError::validation(
                "employee_id",
                format!(
                    "profile for employee {} given for attendance of employee {}",
                    p.employee_id, record.employee_id
                ),
            ));
        }
        Some(p) => p,
        None => {
            warnings.push(AuditWarning::new(
                PROFILE_MISSING,
                format!(
                    "No salary profile for employee {}; salary and DA are zero",
                    record.employee_id
                ),
                "medium",
            ));
            unassigned = EmployeeProfile::unassigned(record.employee_id);
            &unassigned
        }
    };

    let cutoff = period_cutoff(period, today);
    let days_in_month = period.days_in_month();
    steps.push(step(
        1,
        "cutoff",
        "Attendance Cutoff",
        serde_json::json!({
            "period": period.to_string(),
            "today": today.to_string()
        }),
        serde_json::json!({ "cutoff": cutoff, "days_in_month": days_in_month }),
        if period.is_in_progress(today) {
            format!("Month in progress: counting through day {}", cutoff)
        } else {
            format!("Completed month: counting all {} days", days_in_month)
        },
    ));

    let worked = worked_days(record.full_days, record.half_days, cutoff)?;
    let attended = checked_add(
        "full_days",
        record.full_days,
        checked_mul("half_days", record.half_days, HALF_DAY_WEIGHT)?,
    )?;
    if attended > worked {
        warnings.push(AuditWarning::new(
            WORKED_DAYS_CLAMPED,
            format!(
                "{} attended days exceed the {} elapsed days",
                attended.normalize(),
                cutoff
            ),
            "high",
        ));
    }
    steps.push(step(
        2,
        "worked_days",
        "Worked Days",
        serde_json::json!({
            "full_days": record.full_days.normalize().to_string(),
            "half_days": record.half_days.normalize().to_string(),
            "cutoff": cutoff
        }),
        serde_json::json!({ "worked_days": worked.normalize().to_string() }),
        format!(
            "min({} + {} x 0.5, {}) = {}",
            record.full_days.normalize(),
            record.half_days.normalize(),
            cutoff,
            worked.normalize()
        ),
    ));

    let base = base_salary(profile.full_month_salary, worked, days_in_month)?;
    steps.push(step(
        3,
        "base_salary",
        "Base Salary",
        serde_json::json!({
            "full_month_salary": profile.full_month_salary.normalize().to_string(),
            "worked_days": worked.normalize().to_string(),
            "days_in_month": days_in_month
        }),
        serde_json::json!({ "base_salary": base.normalize().to_string() }),
        format!(
            "round({} / {} x {}) = {}",
            profile.full_month_salary.normalize(),
            days_in_month,
            worked.normalize(),
            base.normalize()
        ),
    ));

    let travel = travel_allowance(
        record.distance_travelled_by_car,
        record.distance_travelled_by_bike,
        record.price_per_km_car,
        record.price_per_km_bike,
    )?;
    steps.push(step(
        4,
        "travel_allowance",
        "Travel Allowance",
        serde_json::json!({
            "car_km": record.distance_travelled_by_car.normalize().to_string(),
            "bike_km": record.distance_travelled_by_bike.normalize().to_string(),
            "car_rate": record.price_per_km_car.normalize().to_string(),
            "bike_rate": record.price_per_km_bike.normalize().to_string()
        }),
        serde_json::json!({ "travel_allowance": travel.normalize().to_string() }),
        format!(
            "round({} x {}) + round({} x {}) = {}",
            record.distance_travelled_by_car.normalize(),
            record.price_per_km_car.normalize(),
            record.distance_travelled_by_bike.normalize(),
            record.price_per_km_bike.normalize(),
            travel.normalize()
        ),
    ));

    let da = dearness_allowance(
        profile.dearness_allowance,
        record.full_days,
        record.half_days,
        cutoff,
    )?;
    let da_earned = checked_mul("dearness_allowance", profile.dearness_allowance, attended)?;
    if round_currency(da_earned) > da {
        warnings.push(AuditWarning::new(
            DA_CLAMPED,
            format!(
                "Dearness allowance capped at {} x {} days",
                profile.dearness_allowance.normalize(),
                cutoff
            ),
            "medium",
        ));
    }
    steps.push(step(
        5,
        "dearness_allowance",
        "Dearness Allowance",
        serde_json::json!({
            "daily_rate": profile.dearness_allowance.normalize().to_string(),
            "full_days": record.full_days.normalize().to_string(),
            "half_days": record.half_days.normalize().to_string(),
            "cutoff": cutoff
        }),
        serde_json::json!({ "dearness_allowance": da.normalize().to_string() }),
        format!(
            "round(min({} x {} + {} / 2 x {}, {} x {})) = {}",
            profile.dearness_allowance.normalize(),
            record.full_days.normalize(),
            profile.dearness_allowance.normalize(),
            record.half_days.normalize(),
            profile.dearness_allowance.normalize(),
            cutoff,
            da.normalize()
        ),
    ));

    let expense = require_non_negative("approved_expense", record.approved_expense())?;
    let total = [travel, da, expense]
        .into_iter()
        .try_fold(base, |sum, part| checked_add("total_salary", sum, part))?;
    let total = round_currency(total);
    steps.push(step(
        6,
        "total_salary",
        "Total Salary",
        serde_json::json!({
            "base_salary": base.normalize().to_string(),
            "travel_allowance": travel.normalize().to_string(),
            "dearness_allowance": da.normalize().to_string(),
            "approved_expense": expense.normalize().to_string()
        }),
        serde_json::json!({ "total_salary": total.normalize().to_string() }),
        format!(
            "round({} + {} + {} + {}) = {}",
            base.normalize(),
            travel.normalize(),
            da.normalize(),
            expense.normalize(),
            total.normalize()
        ),
    ));

    Ok(PayrollBreakdown {
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        employee_id: record.employee_id,
        period,
        cutoff,
        days_in_month,
        worked_days: worked,
        base_salary: base,
        travel_allowance: travel,
        dearness_allowance: da,
        approved_expense: expense,
        total_salary: total,
        audit_trace: AuditTrace { steps, warnings },
    })
}

/// Returns only the payable total of [`calculate_payroll`].
pub fn total_salary(
    record: &AttendanceRecord,
    profile: Option<&EmployeeProfile>,
    period: Period,
    today: NaiveDate,
) -> EngineResult<Decimal> {
    calculate_payroll(record, profile, period, today).map(|b| b.total_salary)
}
