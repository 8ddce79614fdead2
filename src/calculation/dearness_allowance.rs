//! Dearness allowance calculation.

use rust_decimal::Decimal;

use crate::error::EngineResult;

use super::rounding::{checked_add, checked_mul, require_non_negative, round_currency};
use super::worked_days::HALF_DAY_WEIGHT;

/// Returns the dearness allowance for the attended days.
///
/// A full day earns the daily rate and a half day earns half of it. The sum is
/// capped at `daily_rate * cutoff`, the most the elapsed period can earn, and
/// then rounded.
///
/// # Examples
///
/// ```
/// use field_payroll::calculation::dearness_allowance;
/// use rust_decimal::Decimal;
///
/// let da = dearness_allowance(Decimal::from(100), Decimal::from(31), Decimal::ZERO, 20).unwrap();
/// assert_eq!(da, Decimal::from(2000));
/// ```
pub fn dearness_allowance(
    daily_rate: Decimal,
    full_days: Decimal,
    half_days: Decimal,
    cutoff: u32,
) -> EngineResult<Decimal> {
    let daily_rate = require_non_negative("dearness_allowance", daily_rate)?;
    let full_days = require_non_negative("full_days", full_days)?;
    let half_days = require_non_negative("half_days", half_days)?;

    let field = "dearness_allowance";
    let full = checked_mul(field, daily_rate, full_days)?;
    let half = checked_mul(field, checked_mul(field, daily_rate, HALF_DAY_WEIGHT)?, half_days)?;
    let earned = checked_add(field, full, half)?;
    let ceiling = checked_mul(field, daily_rate, Decimal::from(cutoff))?;
    Ok(round_currency(earned.min(ceiling)))
}
