//! Currency rounding and input validation shared by the calculator rules.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Rounds to the nearest whole currency unit, halves away from zero.
///
/// # Examples
///
/// ```
/// use field_payroll::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_currency(Decimal::from_str("22.5").unwrap()), Decimal::from(23));
/// assert_eq!(round_currency(Decimal::from_str("17.49").unwrap()), Decimal::from(17));
/// assert_eq!(round_currency(Decimal::from_str("-2.5").unwrap()), Decimal::from(-3));
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rejects negative calculator inputs.
pub(crate) fn require_non_negative(field: &str, value: Decimal) -> EngineResult<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(EngineError::validation(
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    Ok(value)
}

fn overflow(field: &str) -> EngineError {
    EngineError::validation(field, "arithmetic overflow")
}

pub(crate) fn checked_mul(field: &str, a: Decimal, b: Decimal) -> EngineResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(field))
}

pub(crate) fn checked_add(field: &str, a: Decimal, b: Decimal) -> EngineResult<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(field))
}

pub(crate) fn checked_div(field: &str, a: Decimal, b: Decimal) -> EngineResult<Decimal> {
    a.checked_div(b).ok_or_else(|| overflow(field))
}
