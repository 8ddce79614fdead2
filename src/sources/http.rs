//! REST backend client.
//!
//! Talks to the field-sales backend with a bearer token. All bodies are
//! JSON in the backend's camelCase naming.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, EmployeeProfile, EmployeeProfiles, TravelAllowanceDetail};

use super::{AttendanceSource, EmployeeProfileSource, TravelAllowanceSource};

const ATTENDANCE_PATH: &str = "attendance-log/getForRange";
const EMPLOYEES_PATH: &str = "employee/getAll";
const TRAVEL_PATH: &str = "travel-allowance/getForEmployeeAndDate";
const TRAVEL_CREATE_PATH: &str = "travel-allowance/create";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TravelDayPayload {
    employee_id: i64,
    date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    distance_travelled_by_car: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    distance_travelled_by_bike: Decimal,
}

/// HTTP client for the attendance, employee and travel-allowance endpoints.
///
/// # Example
///
/// ```no_run
/// use field_payroll::sources::{AttendanceSource, RestBackend};
/// use chrono::NaiveDate;
///
/// # async fn run() -> field_payroll::error::EngineResult<()> {
/// let backend = RestBackend::new("https://api.example.com", "token");
/// let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 7, 31).unwrap();
/// let records = backend.fetch_attendance(start, end).await?;
/// println!("{} employees", records.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    access_token: String,
}

impl RestBackend {
    /// Creates a client for the backend rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, access_token)
    }

    /// Creates a client that reuses an existing connection pool.
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// Creates a client from the `backend` configuration section.
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.base_url.clone(), config.access_token.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> EngineResult<T> {
        debug!(operation, path, "Backend request");
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| EngineError::io(operation, e))?
            .error_for_status()
            .map_err(|e| {
                warn!(operation, error = %e, "Backend returned an error status");
                EngineError::io(operation, e)
            })?;

        response
            .json::<T>()
            .await
            .map_err(|e| EngineError::io(operation, e))
    }
}

#[async_trait]
impl AttendanceSource for RestBackend {
    async fn fetch_attendance(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        self.get_json(
            "fetch_attendance",
            ATTENDANCE_PATH,
            &[("start", start.to_string()), ("end", end.to_string())],
        )
        .await
    }
}

#[async_trait]
impl EmployeeProfileSource for RestBackend {
    async fn fetch_employee_profiles(&self) -> EngineResult<EmployeeProfiles> {
        let listing: Vec<EmployeeProfile> = self
            .get_json("fetch_employee_profiles", EMPLOYEES_PATH, &[])
            .await?;
        Ok(EmployeeProfile::index(listing))
    }
}

#[async_trait]
impl TravelAllowanceSource for RestBackend {
    async fn fetch_travel_allowance(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<TravelAllowanceDetail> {
        self.get_json(
            "fetch_travel_allowance",
            TRAVEL_PATH,
            &[
                ("employeeId", employee_id.to_string()),
                ("start", start.to_string()),
                ("end", end.to_string()),
            ],
        )
        .await
    }

    async fn persist_travel_day(
        &self,
        employee_id: i64,
        date: NaiveDate,
        car_km: Decimal,
        bike_km: Decimal,
    ) -> EngineResult<()> {
        let payload = TravelDayPayload {
            employee_id,
            date,
            distance_travelled_by_car: car_km,
            distance_travelled_by_bike: bike_km,
        };

        self.client
            .post(self.url(TRAVEL_CREATE_PATH))
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| EngineError::io("persist_travel_day", e))?
            .error_for_status()
            .map_err(|e| EngineError::io("persist_travel_day", e))?;
        Ok(())
    }
}
