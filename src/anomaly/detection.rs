//! Anomaly detection.

use chrono::NaiveDate;

use crate::models::TravelAllowanceDetail;

/// Counts the days with `checkout_count > 0` and zero recorded distance.
///
/// # Examples
///
/// ```
/// use field_payroll::anomaly::count_anomalies;
/// use field_payroll::models::{DateDetail, TravelAllowanceDetail};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let detail = TravelAllowanceDetail {
///     date_details: vec![DateDetail {
///         date: NaiveDate::from_ymd_opt(2024, 7, 3).unwrap(),
///         checkout_count: 2,
///         total_distance_travelled: Decimal::ZERO,
///         visit_details: vec![],
///     }],
/// };
/// assert_eq!(count_anomalies(&detail), 1);
/// ```
pub fn count_anomalies(detail: &TravelAllowanceDetail) -> usize {
    detail.anomalous_days().count()
}

/// The dates of the anomalous days, in entry order.
pub fn anomaly_dates(detail: &TravelAllowanceDetail) -> Vec<NaiveDate> {
    detail.anomalous_days().map(|d| d.date).collect()
}
