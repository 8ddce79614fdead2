//! In-memory backend implementation.
//!
//! This module provides a local implementation of all collaborator traits
//! suitable for unit testing and local development. Data lives in maps behind
//! a shared lock, and individual calls can be made to fail to exercise the
//! error paths of the session and the anomaly resolver.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, Coordinates, EmployeeProfile, EmployeeProfiles, TravelAllowanceDetail,
};

use super::{AttendanceSource, EmployeeProfileSource, RouteLookup, TravelAllowanceSource};

/// A day written through [`TravelAllowanceSource::persist_travel_day`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTravelDay {
    /// The employee the day belongs to.
    pub employee_id: i64,
    /// The day that was written.
    pub date: NaiveDate,
    /// Car kilometers written.
    pub car_km: Decimal,
    /// Bike kilometers written.
    pub bike_km: Decimal,
}

#[derive(Default)]
struct MemoryData {
    attendance: Vec<AttendanceRecord>,
    profiles: EmployeeProfiles,
    travel: HashMap<i64, TravelAllowanceDetail>,
    routes: Vec<(Coordinates, Coordinates, Option<Decimal>)>,
    persisted: Vec<PersistedTravelDay>,
    attendance_requests: Vec<(NaiveDate, NaiveDate)>,
    route_lookups: usize,
    fail_attendance: bool,
    fail_profiles: bool,
    fail_travel_fetch: HashSet<i64>,
    fail_persist: HashSet<(i64, NaiveDate)>,
}

/// In-memory backend.
///
/// Cloning shares the underlying data, so a test can keep a handle for
/// assertions while the session owns another.
///
/// # Example
///
/// ```
/// use field_payroll::models::AttendanceRecord;
/// use field_payroll::sources::{AttendanceSource, InMemoryBackend};
/// use chrono::NaiveDate;
///
/// # #[tokio::main]
/// # async fn main() {
/// let backend = InMemoryBackend::new();
/// backend.insert_attendance(AttendanceRecord { employee_id: 1, ..Default::default() });
///
/// let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 7, 31).unwrap();
/// assert_eq!(backend.fetch_attendance(start, end).await.unwrap().len(), 1);
/// # }
/// ```
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    data: Arc<RwLock<MemoryData>>,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds or replaces the attendance record for its employee.
    pub fn insert_attendance(&self, record: AttendanceRecord) {
        let mut data = self.write();
        data.attendance.retain(|r| r.employee_id != record.employee_id);
        data.attendance.push(record);
    }

    /// Adds or replaces an employee profile.
    pub fn insert_profile(&self, profile: EmployeeProfile) {
        self.write().profiles.insert(profile.employee_id, profile);
    }

    /// Sets an employee's travel detail.
    pub fn insert_travel(&self, employee_id: i64, detail: TravelAllowanceDetail) {
        self.write().travel.insert(employee_id, detail);
    }

    /// Registers the distance between two positions, in both directions.
    pub fn insert_route(&self, from: Coordinates, to: Coordinates, km: Decimal) {
        self.set_route(from, to, Some(km));
    }

    /// Makes lookups between two positions fail.
    pub fn fail_route(&self, from: Coordinates, to: Coordinates) {
        self.set_route(from, to, None);
    }

    fn set_route(&self, from: Coordinates, to: Coordinates, km: Option<Decimal>) {
        let mut data = self.write();
        data.routes
            .retain(|(a, b, _)| !((*a == from && *b == to) || (*a == to && *b == from)));
        data.routes.push((from, to, km));
    }

    /// Makes attendance fetches fail or succeed.
    pub fn set_attendance_failure(&self, fail: bool) {
        self.write().fail_attendance = fail;
    }

    /// Makes profile fetches fail or succeed.
    pub fn set_profile_failure(&self, fail: bool) {
        self.write().fail_profiles = fail;
    }

    /// Makes travel fetches for one employee fail.
    pub fn fail_travel_fetch(&self, employee_id: i64) {
        self.write().fail_travel_fetch.insert(employee_id);
    }

    /// Lets travel fetches for one employee succeed again.
    pub fn restore_travel_fetch(&self, employee_id: i64) {
        self.write().fail_travel_fetch.remove(&employee_id);
    }

    /// Makes writes of one employee's day fail.
    pub fn fail_persist(&self, employee_id: i64, date: NaiveDate) {
        self.write().fail_persist.insert((employee_id, date));
    }

    /// Days written so far, in write order.
    pub fn persisted(&self) -> Vec<PersistedTravelDay> {
        self.read().persisted.clone()
    }

    /// Date windows requested from the attendance source, in request order.
    pub fn attendance_requests(&self) -> Vec<(NaiveDate, NaiveDate)> {
        self.read().attendance_requests.clone()
    }

    /// Number of route lookups served, failed ones included.
    pub fn route_lookups(&self) -> usize {
        self.read().route_lookups
    }

    /// The stored travel detail for an employee.
    pub fn travel(&self, employee_id: i64) -> Option<TravelAllowanceDetail> {
        self.read().travel.get(&employee_id).cloned()
    }
}

#[async_trait]
impl AttendanceSource for InMemoryBackend {
    async fn fetch_attendance(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        let mut data = self.write();
        data.attendance_requests.push((start, end));
        if data.fail_attendance {
            return Err(EngineError::io("fetch_attendance", "attendance source unavailable"));
        }
        Ok(data.attendance.clone())
    }
}

#[async_trait]
impl EmployeeProfileSource for InMemoryBackend {
    async fn fetch_employee_profiles(&self) -> EngineResult<EmployeeProfiles> {
        let data = self.read();
        if data.fail_profiles {
            return Err(EngineError::io(
                "fetch_employee_profiles",
                "profile source unavailable",
            ));
        }
        Ok(data.profiles.clone())
    }
}

#[async_trait]
impl TravelAllowanceSource for InMemoryBackend {
    async fn fetch_travel_allowance(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<TravelAllowanceDetail> {
        let data = self.read();
        if data.fail_travel_fetch.contains(&employee_id) {
            return Err(EngineError::io(
                "fetch_travel_allowance",
                format!("travel data for employee {} unavailable", employee_id),
            ));
        }

        let mut detail = data.travel.get(&employee_id).cloned().unwrap_or_default();
        detail
            .date_details
            .retain(|d| d.date >= start && d.date <= end);
        Ok(detail)
    }

    async fn persist_travel_day(
        &self,
        employee_id: i64,
        date: NaiveDate,
        car_km: Decimal,
        bike_km: Decimal,
    ) -> EngineResult<()> {
        let mut data = self.write();
        if data.fail_persist.contains(&(employee_id, date)) {
            return Err(EngineError::io(
                "persist_travel_day",
                format!("write rejected for employee {} on {}", employee_id, date),
            ));
        }

        data.persisted.push(PersistedTravelDay {
            employee_id,
            date,
            car_km,
            bike_km,
        });
        if let Some(day) = data
            .travel
            .get_mut(&employee_id)
            .and_then(|t| t.date_details.iter_mut().find(|d| d.date == date))
        {
            day.total_distance_travelled = car_km + bike_km;
        }
        Ok(())
    }
}

#[async_trait]
impl RouteLookup for InMemoryBackend {
    async fn lookup_route_distance_km(
        &self,
        from: Coordinates,
        to: Coordinates,
    ) -> EngineResult<Decimal> {
        let mut data = self.write();
        data.route_lookups += 1;

        let route = data
            .routes
            .iter()
            .find(|(a, b, _)| (*a == from && *b == to) || (*a == to && *b == from))
            .map(|(_, _, km)| *km);

        match route {
            Some(Some(km)) => Ok(km),
            Some(None) => Err(EngineError::io(
                "lookup_route_distance_km",
                "routing service error",
            )),
            None => Err(EngineError::io(
                "lookup_route_distance_km",
                format!("no route between {:?} and {:?}", from, to),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateDetail;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    fn anomalous_day(d: u32) -> DateDetail {
        DateDetail {
            date: date(d),
            checkout_count: 2,
            total_distance_travelled: Decimal::ZERO,
            visit_details: vec![],
        }
    }

    #[tokio::test]
    async fn test_attendance_failure_is_io_error() {
        let backend = InMemoryBackend::new();
        backend.set_attendance_failure(true);

        let result = backend.fetch_attendance(date(1), date(31)).await;
        assert!(matches!(result, Err(EngineError::Io { .. })));
        assert_eq!(backend.attendance_requests(), vec![(date(1), date(31))]);
    }

    #[tokio::test]
    async fn test_insert_attendance_replaces_same_employee() {
        let backend = InMemoryBackend::new();
        backend.insert_attendance(AttendanceRecord {
            employee_id: 1,
            full_days: Decimal::from(3),
            ..Default::default()
        });
        backend.insert_attendance(AttendanceRecord {
            employee_id: 1,
            full_days: Decimal::from(4),
            ..Default::default()
        });

        let records = backend.fetch_attendance(date(1), date(31)).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_days, Decimal::from(4));
    }

    #[tokio::test]
    async fn test_travel_fetch_filters_window() {
        let backend = InMemoryBackend::new();
        backend.insert_travel(
            3,
            TravelAllowanceDetail {
                date_details: vec![anomalous_day(1), anomalous_day(15), anomalous_day(31)],
            },
        );

        let detail = backend.fetch_travel_allowance(3, date(2), date(30)).await.unwrap();
        assert_eq!(detail.date_details.len(), 1);
        assert_eq!(detail.date_details[0].date, date(15));
    }

    #[tokio::test]
    async fn test_unknown_employee_travel_is_empty() {
        let backend = InMemoryBackend::new();
        let detail = backend.fetch_travel_allowance(99, date(1), date(31)).await.unwrap();
        assert!(detail.date_details.is_empty());
    }

    #[tokio::test]
    async fn test_persist_updates_stored_total() {
        let backend = InMemoryBackend::new();
        backend.insert_travel(
            3,
            TravelAllowanceDetail {
                date_details: vec![anomalous_day(4)],
            },
        );

        backend
            .persist_travel_day(3, date(4), Decimal::from(5), Decimal::from(7))
            .await
            .unwrap();

        let stored = backend.travel(3).unwrap();
        assert_eq!(stored.date_details[0].total_distance_travelled, Decimal::from(12));
        assert_eq!(backend.persisted().len(), 1);
    }

    #[tokio::test]
    async fn test_persist_failure_leaves_data_untouched() {
        let backend = InMemoryBackend::new();
        backend.insert_travel(
            3,
            TravelAllowanceDetail {
                date_details: vec![anomalous_day(4)],
            },
        );
        backend.fail_persist(3, date(4));

        let result = backend
            .persist_travel_day(3, date(4), Decimal::from(5), Decimal::ZERO)
            .await;
        assert!(result.is_err());
        assert!(backend.persisted().is_empty());
        assert!(backend.travel(3).unwrap().date_details[0].is_anomalous());
    }

    #[tokio::test]
    async fn test_routes_are_symmetric() {
        let backend = InMemoryBackend::new();
        let a = Coordinates::new(18.5, 73.8);
        let b = Coordinates::new(18.6, 73.9);
        backend.insert_route(a, b, Decimal::from(9));

        assert_eq!(backend.lookup_route_distance_km(b, a).await.unwrap(), Decimal::from(9));
        assert_eq!(backend.route_lookups(), 1);
    }

    #[tokio::test]
    async fn test_failed_route_overrides_known_route() {
        let backend = InMemoryBackend::new();
        let a = Coordinates::new(18.5, 73.8);
        let b = Coordinates::new(18.6, 73.9);
        backend.insert_route(a, b, Decimal::from(9));
        backend.fail_route(b, a);

        assert!(backend.lookup_route_distance_km(a, b).await.is_err());
    }

    #[tokio::test]
    async fn test_failed_route_is_io_error() {
        let backend = InMemoryBackend::new();
        let a = Coordinates::new(18.5, 73.8);
        let b = Coordinates::new(18.6, 73.9);
        backend.fail_route(a, b);

        assert!(backend.lookup_route_distance_km(a, b).await.is_err());
    }
}
