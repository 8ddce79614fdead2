//! Distance backfill for anomalous days.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::{DateDetail, TravelAllowanceDetail, VehicleType};
use crate::sources::{RouteLookup, TravelAllowanceSource};

/// What happened to one anomalous day during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayResolution {
    /// The day that was processed.
    pub date: chrono::NaiveDate,
    /// Kilometers rebuilt for car legs.
    pub car_km: Decimal,
    /// Kilometers rebuilt for bike legs.
    pub bike_km: Decimal,
    /// Consecutive visit pairs whose distance was looked up successfully.
    pub legs_measured: u32,
    /// Consecutive visit pairs whose lookup failed and counted as zero.
    pub legs_failed: u32,
    /// Whether the rebuilt distances were written to the backend.
    pub persisted: bool,
    /// The write error, when `persisted` is false.
    pub error: Option<String>,
}

/// The outcome of resolving one employee's anomalies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// The employee the detail belongs to.
    pub employee_id: i64,
    /// A new detail with the written days' totals replaced.
    pub detail: TravelAllowanceDetail,
    /// One entry per anomalous day, in date order.
    pub days: Vec<DayResolution>,
}

impl ResolutionResult {
    /// Number of days whose distance was written back.
    pub fn days_persisted(&self) -> usize {
        self.days.iter().filter(|d| d.persisted).count()
    }

    /// Number of days whose write failed.
    pub fn days_failed(&self) -> usize {
        self.days.iter().filter(|d| !d.persisted).count()
    }
}

/// Rebuilds missing travel distances from visit check-in positions.
///
/// For every anomalous day the consecutive visits are walked pairwise. Each
/// pair with both check-ins present is measured with the routing service and
/// added to the car or bike total according to the first visit's vehicle.
/// The day's totals are then written back and the day's recorded distance is
/// replaced with their sum.
///
/// Failures are isolated: a failed lookup contributes zero and the walk goes
/// on, and a failed write is logged and leaves that day flagged while the
/// other days proceed. Nothing is retried. Re-running recomputes a day from
/// scratch, so repeated runs overwrite rather than accumulate.
#[derive(Clone)]
pub struct AnomalyResolver {
    travel: Arc<dyn TravelAllowanceSource>,
    routes: Arc<dyn RouteLookup>,
}

impl AnomalyResolver {
    /// Creates a resolver writing through `travel` and measuring with `routes`.
    pub fn new(travel: Arc<dyn TravelAllowanceSource>, routes: Arc<dyn RouteLookup>) -> Self {
        Self { travel, routes }
    }

    /// Resolves every anomalous day of `detail`.
    ///
    /// The input is left untouched; the returned result holds the updated copy.
    pub async fn resolve(&self, employee_id: i64, detail: &TravelAllowanceDetail) -> ResolutionResult {
        let mut updated = detail.clone();
        let mut days = Vec::new();

        for day in updated.date_details.iter_mut().filter(|d| d.is_anomalous()) {
            let resolution = self.resolve_day(employee_id, day).await;
            if resolution.persisted {
                day.total_distance_travelled = resolution.car_km + resolution.bike_km;
            }
            days.push(resolution);
        }

        let result = ResolutionResult {
            employee_id,
            detail: updated,
            days,
        };
        info!(
            employee_id,
            days_persisted = result.days_persisted(),
            days_failed = result.days_failed(),
            "Anomaly resolution finished"
        );
        result
    }

    async fn resolve_day(&self, employee_id: i64, day: &DateDetail) -> DayResolution {
        let mut car_km = Decimal::ZERO;
        let mut bike_km = Decimal::ZERO;
        let mut legs_measured = 0;
        let mut legs_failed = 0;

        for pair in day.visit_details.windows(2) {
            let (Some(from), Some(to)) = (pair[0].checkin(), pair[1].checkin()) else {
                continue;
            };

            match self.routes.lookup_route_distance_km(from, to).await {
                Ok(km) => {
                    legs_measured += 1;
                    match pair[0].vehicle_type {
                        VehicleType::Car => car_km += km,
                        VehicleType::Bike => bike_km += km,
                    }
                }
                Err(e) => {
                    legs_failed += 1;
                    warn!(employee_id, date = %day.date, error = %e, "Route lookup failed; leg counts as zero");
                }
            }
        }

        let (persisted, error) = match self
            .travel
            .persist_travel_day(employee_id, day.date, car_km, bike_km)
            .await
        {
            Ok(()) => (true, None),
            Err(e) => {
                warn!(employee_id, date = %day.date, error = %e, "Failed to store rebuilt distance");
                (false, Some(e.to_string()))
            }
        };

        DayResolution {
            date: day.date,
            car_km,
            bike_km,
            legs_measured,
            legs_failed,
            persisted,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, VisitDetail};
    use crate::sources::InMemoryBackend;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    fn visit(lat: f64, lon: f64, vehicle_type: VehicleType) -> VisitDetail {
        VisitDetail {
            visit_id: None,
            checkin_latitude: Some(lat),
            checkin_longitude: Some(lon),
            vehicle_type,
        }
    }

    fn resolver(backend: &InMemoryBackend) -> AnomalyResolver {
        AnomalyResolver::new(Arc::new(backend.clone()), Arc::new(backend.clone()))
    }

    fn a() -> Coordinates {
        Coordinates::new(18.50, 73.80)
    }
    fn b() -> Coordinates {
        Coordinates::new(18.55, 73.85)
    }
    fn c() -> Coordinates {
        Coordinates::new(18.60, 73.90)
    }

    fn anomalous_day(d: u32, visits: Vec<VisitDetail>) -> DateDetail {
        DateDetail {
            date: date(d),
            checkout_count: visits.len() as u32,
            total_distance_travelled: Decimal::ZERO,
            visit_details: visits,
        }
    }

    fn setup() -> (InMemoryBackend, TravelAllowanceDetail) {
        let backend = InMemoryBackend::new();
        backend.insert_route(a(), b(), dec("4.5"));
        backend.insert_route(b(), c(), dec("6.25"));

        let detail = TravelAllowanceDetail {
            date_details: vec![
                anomalous_day(
                    2,
                    vec![
                        visit(18.50, 73.80, VehicleType::Car),
                        visit(18.55, 73.85, VehicleType::Bike),
                        visit(18.60, 73.90, VehicleType::Bike),
                    ],
                ),
                DateDetail {
                    date: date(3),
                    checkout_count: 2,
                    total_distance_travelled: dec("11"),
                    visit_details: vec![],
                },
            ],
        };
        backend.insert_travel(7, detail.clone());
        (backend, detail)
    }

    #[tokio::test]
    async fn test_distances_accumulate_per_vehicle() {
        let (backend, detail) = setup();
        let result = resolver(&backend).resolve(7, &detail).await;

        assert_eq!(result.days.len(), 1);
        let day = &result.days[0];
        assert_eq!(day.car_km, dec("4.5"));
        assert_eq!(day.bike_km, dec("6.25"));
        assert_eq!(day.legs_measured, 2);
        assert!(day.persisted);
        assert_eq!(
            result.detail.date_details[0].total_distance_travelled,
            dec("10.75")
        );
    }

    #[tokio::test]
    async fn test_input_detail_is_not_mutated() {
        let (backend, detail) = setup();
        let before = detail.clone();
        let _ = resolver(&backend).resolve(7, &detail).await;
        assert_eq!(detail, before);
    }

    #[tokio::test]
    async fn test_non_anomalous_days_are_untouched() {
        let (backend, detail) = setup();
        let result = resolver(&backend).resolve(7, &detail).await;

        assert_eq!(result.detail.date_details[1], detail.date_details[1]);
        assert_eq!(backend.persisted().len(), 1);
    }

    #[tokio::test]
    async fn test_persisted_values_match_rebuilt_distances() {
        let (backend, detail) = setup();
        let _ = resolver(&backend).resolve(7, &detail).await;

        let written = &backend.persisted()[0];
        assert_eq!(written.employee_id, 7);
        assert_eq!(written.date, date(2));
        assert_eq!(written.car_km, dec("4.5"));
        assert_eq!(written.bike_km, dec("6.25"));
    }

    #[tokio::test]
    async fn test_failed_lookup_counts_zero_and_continues() {
        let backend = InMemoryBackend::new();
        backend.fail_route(a(), b());
        backend.insert_route(b(), c(), dec("3"));
        let detail = TravelAllowanceDetail {
            date_details: vec![anomalous_day(
                5,
                vec![
                    visit(18.50, 73.80, VehicleType::Bike),
                    visit(18.55, 73.85, VehicleType::Bike),
                    visit(18.60, 73.90, VehicleType::Bike),
                ],
            )],
        };

        let result = resolver(&backend).resolve(7, &detail).await;
        let day = &result.days[0];
        assert_eq!(day.legs_failed, 1);
        assert_eq!(day.legs_measured, 1);
        assert_eq!(day.bike_km, dec("3"));
        assert_eq!(backend.route_lookups(), 2);
    }

    #[tokio::test]
    async fn test_pairs_missing_coordinates_are_skipped() {
        let backend = InMemoryBackend::new();
        backend.insert_route(a(), c(), dec("8"));
        let detail = TravelAllowanceDetail {
            date_details: vec![anomalous_day(
                6,
                vec![
                    visit(18.50, 73.80, VehicleType::Car),
                    VisitDetail::default(),
                    visit(18.60, 73.90, VehicleType::Car),
                ],
            )],
        };

        let result = resolver(&backend).resolve(7, &detail).await;
        assert_eq!(backend.route_lookups(), 0);
        assert_eq!(result.days[0].car_km, Decimal::ZERO);
        // Written as zero, so the day stays flagged.
        assert!(result.days[0].persisted);
        assert!(result.detail.date_details[0].is_anomalous());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_day_flagged_and_others_proceed() {
        let (backend, _) = setup();
        let detail = TravelAllowanceDetail {
            date_details: vec![
                anomalous_day(
                    8,
                    vec![
                        visit(18.50, 73.80, VehicleType::Bike),
                        visit(18.55, 73.85, VehicleType::Bike),
                    ],
                ),
                anomalous_day(
                    9,
                    vec![
                        visit(18.55, 73.85, VehicleType::Car),
                        visit(18.60, 73.90, VehicleType::Car),
                    ],
                ),
            ],
        };
        backend.fail_persist(7, date(8));

        let result = resolver(&backend).resolve(7, &detail).await;

        assert_eq!(result.days_failed(), 1);
        assert_eq!(result.days_persisted(), 1);
        assert!(result.days[0].error.is_some());
        assert!(result.detail.date_details[0].is_anomalous());
        assert_eq!(
            result.detail.date_details[1].total_distance_travelled,
            dec("6.25")
        );
    }

    #[tokio::test]
    async fn test_rerun_overwrites_instead_of_accumulating() {
        let (backend, detail) = setup();
        let resolver = resolver(&backend);
        let first = resolver.resolve(7, &detail).await;
        let second = resolver.resolve(7, &detail).await;

        assert_eq!(first.detail, second.detail);
        let written = backend.persisted();
        assert_eq!(written.len(), 2);
        assert_eq!(written[0], written[1]);
    }

    #[tokio::test]
    async fn test_clean_detail_makes_no_calls() {
        let backend = InMemoryBackend::new();
        let detail = TravelAllowanceDetail {
            date_details: vec![DateDetail {
                date: date(1),
                checkout_count: 0,
                total_distance_travelled: Decimal::ZERO,
                visit_details: vec![],
            }],
        };

        let result = resolver(&backend).resolve(7, &detail).await;
        assert!(result.days.is_empty());
        assert_eq!(result.detail, detail);
        assert!(backend.persisted().is_empty());
    }
}
