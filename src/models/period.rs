//! Calendar month model.
//!
//! A [`Period`] is a validated `(year, month)` pair. Salary figures are always
//! computed for a whole calendar month, truncated to "yesterday" when the month
//! is still in progress.

use std::fmt;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PeriodParts {
    year: i32,
    month: u32,
}

/// A calendar month.
///
/// # Example
///
/// ```
/// use field_payroll::models::Period;
/// use chrono::NaiveDate;
///
/// let period = Period::new(2024, 2).unwrap();
/// assert_eq!(period.days_in_month(), 29);
/// assert_eq!(period.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// assert_eq!(period.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert_eq!(period.to_string(), "2024-02");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "PeriodParts", into = "PeriodParts")]
pub struct Period {
    year: i32,
    month: u32,
    days: u32,
}

impl Period {
    /// Creates a period, rejecting months outside `1..=12`.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        let days = month_length(year, month).ok_or_else(|| {
            EngineError::validation("month", format!("{}-{} is not a calendar month", year, month))
        })?;
        Ok(Self { year, month, days })
    }

    /// The period containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            // Only December of chrono's last representable year lacks a successor month.
            days: month_length(date.year(), date.month()).unwrap_or(31),
        }
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The calendar month, `1..=12`.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Number of calendar days in the month, leap years included.
    pub fn days_in_month(&self) -> u32 {
        self.days
    }

    /// The first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.day(1).unwrap_or_default()
    }

    /// The last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.day(self.days).unwrap_or_default()
    }

    /// The given day of this month, if it exists.
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// Returns true if `today` falls inside this month.
    pub fn is_in_progress(&self, today: NaiveDate) -> bool {
        today.year() == self.year && today.month() == self.month
    }
}

fn month_length(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    Some(next.signed_duration_since(first).num_days() as u32)
}

impl TryFrom<PeriodParts> for Period {
    type Error = EngineError;

    fn try_from(parts: PeriodParts) -> EngineResult<Self> {
        Period::new(parts.year, parts.month)
    }
}

impl From<Period> for PeriodParts {
    fn from(period: Period) -> Self {
        PeriodParts {
            year: period.year,
            month: period.month,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
