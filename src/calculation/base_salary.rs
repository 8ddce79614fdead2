//! Base salary proration.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

use super::rounding::{checked_div, checked_mul, require_non_negative, round_currency};

/// Prorates a full-month salary to the days worked.
///
/// The daily rate is the monthly salary over the calendar days of the month
/// (not the cutoff). The product is rounded once, at the end. The salary is
/// multiplied before dividing so that a fully worked month returns exactly the
/// monthly salary.
///
/// # Errors
///
/// Returns a validation error for a negative salary or day count, or a
/// zero-length month.
///
/// # Examples
///
/// ```
/// use field_payroll::calculation::base_salary;
/// use rust_decimal::Decimal;
///
/// let salary = base_salary(Decimal::from(62000), Decimal::from(21), 31).unwrap();
/// assert_eq!(salary, Decimal::from(42000));
/// ```
pub fn base_salary(
    full_month_salary: Decimal,
    worked_days: Decimal,
    days_in_month: u32,
) -> EngineResult<Decimal> {
    let full_month_salary = require_non_negative("full_month_salary", full_month_salary)?;
    let worked_days = require_non_negative("worked_days", worked_days)?;
    if days_in_month == 0 {
        return Err(EngineError::validation(
            "days_in_month",
            "must be greater than zero",
        ));
    }

    let salary_days = checked_mul("full_month_salary", full_month_salary, worked_days)?;
    let prorated = checked_div("full_month_salary", salary_days, Decimal::from(days_in_month))?;
    Ok(round_currency(prorated))
}
