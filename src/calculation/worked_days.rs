//! Worked-day calculation.
//!
//! Half days count half. The total is clamped to the cutoff so that duplicate
//! check-ins upstream can never push attendance past the elapsed days.

use rust_decimal::Decimal;

use crate::error::EngineResult;

use super::rounding::{checked_add, checked_mul, require_non_negative};

/// Weight of a half attendance day.
pub const HALF_DAY_WEIGHT: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Returns `min(full_days + half_days * 0.5, cutoff)`.
///
/// # Errors
///
/// Returns a validation error if either day count is negative.
///
/// # Examples
///
/// ```
/// use field_payroll::calculation::worked_days;
/// use rust_decimal::Decimal;
///
/// assert_eq!(worked_days(Decimal::from(20), Decimal::from(2), 31).unwrap(), Decimal::from(21));
/// assert_eq!(worked_days(Decimal::from(15), Decimal::ZERO, 9).unwrap(), Decimal::from(9));
/// ```
pub fn worked_days(full_days: Decimal, half_days: Decimal, cutoff: u32) -> EngineResult<Decimal> {
    let full_days = require_non_negative("full_days", full_days)?;
    let half_days = require_non_negative("half_days", half_days)?;

    let half = checked_mul("half_days", half_days, HALF_DAY_WEIGHT)?;
    let attended = checked_add("full_days", full_days, half)?;
    Ok(attended.min(Decimal::from(cutoff)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_half_days_count_half() {
        assert_eq!(worked_days(dec("20"), dec("2"), 31).unwrap(), dec("21"));
        assert_eq!(worked_days(dec("0"), dec("3"), 31).unwrap(), dec("1.5"));
    }

    #[test]
    fn test_clamped_to_cutoff_in_current_month() {
        // 2024-07-10: cutoff is 9, fifteen full days is a data error.
        assert_eq!(worked_days(dec("15"), dec("0"), 9).unwrap(), dec("9"));
    }

    #[test]
    fn test_exactly_at_cutoff_is_unchanged() {
        assert_eq!(worked_days(dec("8"), dec("2"), 9).unwrap(), dec("9"));
    }

    #[test]
    fn test_zero_cutoff_yields_zero() {
        assert_eq!(worked_days(dec("1"), dec("1"), 0).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_negative_full_days_is_rejected() {
        let err = worked_days(dec("-1"), dec("0"), 31).unwrap_err();
        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "full_days"));
    }

    #[test]
    fn test_negative_half_days_is_rejected() {
        let err = worked_days(dec("1"), dec("-2"), 31).unwrap_err();
        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "half_days"));
    }

    proptest! {
        #[test]
        fn prop_worked_days_never_exceed_cutoff(full in 0u32..100, half in 0u32..100, cutoff in 0u32..32) {
            let days = worked_days(Decimal::from(full), Decimal::from(half), cutoff).unwrap();
            prop_assert!(days <= Decimal::from(cutoff));
            prop_assert!(days >= Decimal::ZERO);
        }
    }
}
