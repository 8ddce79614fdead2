//! Collaborators the engine reads from and writes to.
//!
//! Each backend concern is a trait so that the session and the anomaly
//! resolver can run against the REST backend, the routing service, or the
//! in-memory backend used in tests. Every call returns an [`EngineResult`],
//! with transport and server failures surfacing as [`EngineError::Io`].
//!
//! [`EngineError::Io`]: crate::error::EngineError::Io

mod http;
mod memory;
mod routing;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{AttendanceRecord, Coordinates, EmployeeProfiles, TravelAllowanceDetail};

pub use http::RestBackend;
pub use memory::{InMemoryBackend, PersistedTravelDay};
pub use routing::RoutingClient;

/// Source of attendance summaries.
#[async_trait]
pub trait AttendanceSource: Send + Sync {
    /// Fetches one record per employee for the inclusive date window.
    async fn fetch_attendance(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>>;
}

/// Source of employee salary settings.
#[async_trait]
pub trait EmployeeProfileSource: Send + Sync {
    /// Fetches every employee profile, keyed by employee id.
    async fn fetch_employee_profiles(&self) -> EngineResult<EmployeeProfiles>;
}

/// Source and sink of per-day travel data.
#[async_trait]
pub trait TravelAllowanceSource: Send + Sync {
    /// Fetches an employee's travel detail for the inclusive date window.
    async fn fetch_travel_allowance(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<TravelAllowanceDetail>;

    /// Stores recomputed car and bike kilometers for one day.
    async fn persist_travel_day(
        &self,
        employee_id: i64,
        date: NaiveDate,
        car_km: Decimal,
        bike_km: Decimal,
    ) -> EngineResult<()>;
}

/// Road-distance lookup between two positions.
#[async_trait]
pub trait RouteLookup: Send + Sync {
    /// Returns the driving distance in kilometers.
    async fn lookup_route_distance_km(
        &self,
        from: Coordinates,
        to: Coordinates,
    ) -> EngineResult<Decimal>;
}
