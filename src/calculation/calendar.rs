//! Calendar helpers: month length and the attendance cutoff day.

use chrono::{Datelike, NaiveDate};

use crate::error::EngineResult;
use crate::models::Period;

/// Returns the number of calendar days in `month` of `year`.
///
/// # Examples
///
/// ```
/// use field_payroll::calculation::days_in_month;
///
/// assert_eq!(days_in_month(2024, 7).unwrap(), 31);
/// assert_eq!(days_in_month(2024, 2).unwrap(), 29);
/// assert!(days_in_month(2024, 13).is_err());
/// ```
pub fn days_in_month(year: i32, month: u32) -> EngineResult<u32> {
    Ok(Period::new(year, month)?.days_in_month())
}

/// Returns the last day of the month whose attendance is final.
///
/// For the month containing `today` that is yesterday (`today.day - 1`, so
/// zero on the first of the month). Any other month is counted in full.
///
/// # Examples
///
/// ```
/// use field_payroll::calculation::effective_cutoff;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();
/// assert_eq!(effective_cutoff(2024, 7, today).unwrap(), 9);
/// assert_eq!(effective_cutoff(2024, 6, today).unwrap(), 30);
/// ```
pub fn effective_cutoff(year: i32, month: u32, today: NaiveDate) -> EngineResult<u32> {
    Ok(period_cutoff(Period::new(year, month)?, today))
}

/// [`effective_cutoff`] for an already validated period.
pub fn period_cutoff(period: Period, today: NaiveDate) -> u32 {
    if period.is_in_progress(today) {
        today.day() - 1
    } else {
        period.days_in_month()
    }
}
