//! Detection and repair of days with a checkout but no recorded distance.
//!
//! A day is anomalous when the field app recorded at least one checkout but
//! the backend has zero kilometers for it, which happens when GPS data was
//! lost. [`count_anomalies`] flags such days; [`AnomalyResolver`] rebuilds
//! their distance from consecutive visit check-ins through the routing
//! service and writes it back.

mod detection;
mod resolver;

pub use detection::{anomaly_dates, count_anomalies};
pub use resolver::{AnomalyResolver, DayResolution, ResolutionResult};
