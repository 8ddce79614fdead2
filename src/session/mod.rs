//! The salary listing for one selected month.
//!
//! A [`SalarySession`] loads attendance, salary profiles and travel data for
//! a month, derives the salary rows, and drives anomaly resolution per
//! employee. Resolutions run as detached [`ResolutionJob`]s; each carries a
//! ticket of the selection it was started for, and its outcome is applied
//! only if that selection is still current.
//!
//! # Example
//!
//! ```
//! use field_payroll::models::{AttendanceRecord, Period};
//! use field_payroll::session::{SalarySession, SessionState};
//! use field_payroll::sources::InMemoryBackend;
//! use chrono::NaiveDate;
//!
//! # #[tokio::main]
//! # async fn main() -> field_payroll::error::EngineResult<()> {
//! let backend = InMemoryBackend::new();
//! backend.insert_attendance(AttendanceRecord { employee_id: 1, ..Default::default() });
//!
//! let mut session = SalarySession::with_backend(backend);
//! let today = NaiveDate::from_ymd_opt(2024, 8, 15).unwrap();
//! session.load(Period::new(2024, 7)?, today).await?;
//!
//! assert_eq!(session.state(), &SessionState::Ready);
//! assert_eq!(session.rows()?.len(), 1);
//! # Ok(())
//! # }
//! ```

mod cache;
mod job;
mod state;

pub use cache::TravelCache;
pub use job::{ResolutionApplied, ResolutionJob, ResolutionOutcome, ResolutionTicket};
pub use state::{EmployeeStatus, SessionState};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::anomaly::{AnomalyResolver, count_anomalies};
use crate::calculation::{calculate_payroll, period_cutoff};
use crate::config::{ConfigLoader, DEFAULT_ROWS_PER_PAGE};
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, EmployeeProfiles, Period, TravelAllowanceDetail};
use crate::report::{SalaryReport, SalaryRow};
use crate::sources::{
    AttendanceSource, EmployeeProfileSource, RestBackend, RouteLookup, RoutingClient,
    TravelAllowanceSource,
};

/// Salary listing state for one month selection.
pub struct SalarySession {
    attendance: Arc<dyn AttendanceSource>,
    profiles_source: Arc<dyn EmployeeProfileSource>,
    travel: Arc<dyn TravelAllowanceSource>,
    resolver: AnomalyResolver,
    rows_per_page: usize,

    state: SessionState,
    period: Option<Period>,
    today: Option<NaiveDate>,
    generation: u64,
    records: Vec<AttendanceRecord>,
    profiles: EmployeeProfiles,
    cache: TravelCache,
    statuses: HashMap<i64, EmployeeStatus>,
}

impl SalarySession {
    /// Creates a session over explicit collaborators.
    pub fn new(
        attendance: Arc<dyn AttendanceSource>,
        profiles: Arc<dyn EmployeeProfileSource>,
        travel: Arc<dyn TravelAllowanceSource>,
        routes: Arc<dyn RouteLookup>,
    ) -> Self {
        Self {
            attendance,
            profiles_source: profiles,
            resolver: AnomalyResolver::new(travel.clone(), routes),
            travel,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            state: SessionState::Idle,
            period: None,
            today: None,
            generation: 0,
            records: Vec::new(),
            profiles: EmployeeProfiles::new(),
            cache: TravelCache::new(),
            statuses: HashMap::new(),
        }
    }

    /// Creates a session whose collaborators are all served by one backend.
    pub fn with_backend<B>(backend: B) -> Self
    where
        B: AttendanceSource
            + EmployeeProfileSource
            + TravelAllowanceSource
            + RouteLookup
            + Clone
            + 'static,
    {
        Self::new(
            Arc::new(backend.clone()),
            Arc::new(backend.clone()),
            Arc::new(backend.clone()),
            Arc::new(backend),
        )
    }

    /// Creates a session against the configured REST backend and routing service.
    pub fn from_config(config: &ConfigLoader) -> Self {
        let backend = RestBackend::from_config(config.backend());
        let routing = RoutingClient::from_config(config.routing());
        Self::new(
            Arc::new(backend.clone()),
            Arc::new(backend.clone()),
            Arc::new(backend),
            Arc::new(routing),
        )
        .with_rows_per_page(config.report().rows_per_page)
    }

    /// Sets the report page size.
    pub fn with_rows_per_page(mut self, rows_per_page: usize) -> Self {
        self.rows_per_page = rows_per_page;
        self
    }

    /// Page-level state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The selected month, once a load has started.
    pub fn period(&self) -> Option<Period> {
        self.period
    }

    /// Counter bumped by every load; resolutions started earlier are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the loaded month has any attendance.
    pub fn has_data(&self) -> bool {
        self.state.is_ready() && !self.records.is_empty()
    }

    /// Status of one employee in the loaded month.
    pub fn status(&self, employee_id: i64) -> Option<&EmployeeStatus> {
        self.statuses.get(&employee_id)
    }

    /// The cached travel detail of one employee for the loaded month.
    pub fn travel_detail(&self, employee_id: i64) -> Option<&TravelAllowanceDetail> {
        self.cache.get(employee_id, self.period?)
    }

    /// Employees with at least one day missing its distance, in load order.
    pub fn flagged_employees(&self) -> Vec<i64> {
        self.records
            .iter()
            .map(|r| r.employee_id)
            .filter(|id| {
                self.travel_detail(*id)
                    .is_some_and(|detail| count_anomalies(detail) > 0)
            })
            .collect()
    }

    /// Loads a month.
    ///
    /// Attendance is requested from the first day through the cutoff; a month
    /// whose cutoff is zero has no attendance yet and the source is not
    /// called. If attendance or profiles cannot be fetched the session moves
    /// to [`SessionState::Error`] with no rows. A record the calculator
    /// rejects is left out of the listing and its employee marked
    /// [`EmployeeStatus::Failed`]. Travel data is then fetched per employee;
    /// one employee's failure only marks that employee.
    pub async fn load(&mut self, period: Period, today: NaiveDate) -> EngineResult<()> {
        if self.period != Some(period) {
            self.cache.retain_period(period);
        }
        self.generation += 1;
        self.period = Some(period);
        self.today = Some(today);
        self.state = SessionState::Loading;
        self.records.clear();
        self.profiles.clear();
        self.statuses.clear();

        let cutoff = period_cutoff(period, today);
        if cutoff == 0 {
            debug!(period = %period, "Month has no elapsed days");
            self.state = SessionState::Ready;
            return Ok(());
        }

        let (records, profiles) = match self.fetch_month(period, cutoff).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(period = %period, error = %e, "Failed to load month");
                self.state = SessionState::Error(e.to_string());
                return Err(e);
            }
        };

        let records = self.accept_records(records, &profiles, period, today);

        let travel = join_all(records.iter().map(|r| {
            self.travel.fetch_travel_allowance(r.employee_id, period.first_day(), period.last_day())
        }))
        .await;

        for (record, fetched) in records.iter().zip(travel) {
            let status = match fetched {
                Ok(detail) => {
                    self.cache.upsert(record.employee_id, period, detail);
                    EmployeeStatus::Ready
                }
                Err(e) => {
                    warn!(employee_id = record.employee_id, period = %period, error = %e, "Failed to fetch travel data");
                    self.cache.remove(record.employee_id, period);
                    EmployeeStatus::Failed(e.to_string())
                }
            };
            self.statuses.insert(record.employee_id, status);
        }

        info!(period = %period, cutoff, employees = records.len(), "Month loaded");
        self.records = records;
        self.profiles = profiles;
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Loads the month containing `today`.
    pub async fn load_current_month(&mut self, today: NaiveDate) -> EngineResult<()> {
        self.load(Period::containing(today), today).await
    }

    fn accept_records(
        &mut self,
        records: Vec<AttendanceRecord>,
        profiles: &EmployeeProfiles,
        period: Period,
        today: NaiveDate,
    ) -> Vec<AttendanceRecord> {
        let mut accepted = Vec::with_capacity(records.len());
        for record in records {
            let profile = profiles.get(&record.employee_id);
            match calculate_payroll(&record, profile, period, today) {
                Ok(_) => accepted.push(record),
                Err(e) => {
                    warn!(employee_id = record.employee_id, period = %period, error = %e, "Rejected attendance record");
                    self.statuses
                        .insert(record.employee_id, EmployeeStatus::Failed(e.to_string()));
                }
            }
        }
        accepted
    }

    async fn fetch_month(
        &self,
        period: Period,
        cutoff: u32,
    ) -> EngineResult<(Vec<AttendanceRecord>, EmployeeProfiles)> {
        let end = period
            .day(cutoff)
            .ok_or_else(|| EngineError::validation("cutoff", format!("day {} is not in {}", cutoff, period)))?;

        let (records, profiles) = futures::join!(
            self.attendance.fetch_attendance(period.first_day(), end),
            self.profiles_source.fetch_employee_profiles()
        );
        Ok((records?, profiles?))
    }

    /// Re-reads one employee's travel data for the loaded month.
    pub async fn refresh_employee(&mut self, employee_id: i64) -> EngineResult<()> {
        let period = self.require_employee(employee_id)?;

        match self
            .travel
            .fetch_travel_allowance(employee_id, period.first_day(), period.last_day())
            .await
        {
            Ok(detail) => {
                self.cache.upsert(employee_id, period, detail);
                self.statuses.insert(employee_id, EmployeeStatus::Ready);
                Ok(())
            }
            Err(e) => {
                warn!(employee_id, period = %period, error = %e, "Failed to refresh travel data");
                self.statuses
                    .insert(employee_id, EmployeeStatus::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Starts a distance backfill for one employee.
    ///
    /// The returned job does not borrow the session. Pass its outcome to
    /// [`complete_resolution`](Self::complete_resolution).
    ///
    /// # Errors
    ///
    /// `EmployeeNotFound` if the employee is not in the loaded month or has
    /// no travel data.
    pub fn begin_resolution(&mut self, employee_id: i64) -> EngineResult<ResolutionJob> {
        let period = self.require_employee(employee_id)?;
        let detail = self
            .cache
            .get(employee_id, period)
            .cloned()
            .ok_or(EngineError::EmployeeNotFound { employee_id })?;

        self.statuses.insert(employee_id, EmployeeStatus::Resolving);
        debug!(employee_id, period = %period, generation = self.generation, "Resolution started");

        Ok(ResolutionJob {
            ticket: ResolutionTicket {
                generation: self.generation,
                period,
                employee_id,
            },
            detail,
            resolver: self.resolver.clone(),
            travel: self.travel.clone(),
        })
    }

    /// Applies a finished resolution, unless its selection is gone.
    ///
    /// Only the resolved employee's travel data and status change.
    pub fn complete_resolution(&mut self, outcome: ResolutionOutcome) -> ResolutionApplied {
        let ticket = outcome.ticket;
        let employee_id = ticket.employee_id;

        if let Err(e) = self.check_ticket(&ticket) {
            debug!(employee_id, error = %e, "Discarding resolution result");
            return ResolutionApplied::Discarded { employee_id };
        }

        let remaining_anomalies = count_anomalies(&outcome.detail);
        let failed = outcome.result.days_failed();
        self.cache.upsert(employee_id, ticket.period, outcome.detail);

        let status = if failed == 0 {
            EmployeeStatus::Ready
        } else {
            EmployeeStatus::Failed(format!("{} day(s) could not be stored", failed))
        };
        self.statuses.insert(employee_id, status);

        info!(
            employee_id,
            period = %ticket.period,
            remaining_anomalies,
            refreshed = outcome.refreshed,
            "Resolution applied"
        );
        ResolutionApplied::Applied {
            employee_id,
            remaining_anomalies,
        }
    }

    /// Resolves every flagged employee concurrently and applies each result.
    ///
    /// Employees with a resolution already running are skipped.
    pub async fn resolve_all_flagged(&mut self) -> Vec<ResolutionApplied> {
        let mut jobs: Vec<ResolutionJob> = Vec::new();
        for id in self.flagged_employees() {
            if self.status(id) != Some(&EmployeeStatus::Resolving) {
                if let Ok(job) = self.begin_resolution(id) {
                    jobs.push(job);
                }
            }
        }

        let outcomes = join_all(jobs.into_iter().map(ResolutionJob::run)).await;

        outcomes
            .into_iter()
            .map(|outcome| self.complete_resolution(outcome))
            .collect()
    }

    /// Salary rows for the loaded month, in load order.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the calculator.
    pub fn rows(&self) -> EngineResult<Vec<SalaryRow>> {
        let (Some(period), Some(today)) = (self.period, self.today) else {
            return Ok(Vec::new());
        };
        if !self.state.is_ready() {
            return Ok(Vec::new());
        }

        self.records
            .iter()
            .map(|record| {
                let breakdown = calculate_payroll(
                    record,
                    self.profiles.get(&record.employee_id),
                    period,
                    today,
                )?;
                let anomalies = self
                    .cache
                    .get(record.employee_id, period)
                    .map(count_anomalies)
                    .unwrap_or(0);
                Ok(SalaryRow::new(record, &breakdown, anomalies))
            })
            .collect()
    }

    /// The sorted, pageable salary listing.
    pub fn report(&self) -> EngineResult<SalaryReport> {
        Ok(SalaryReport::with_rows_per_page(self.rows()?, self.rows_per_page))
    }

    fn require_employee(&self, employee_id: i64) -> EngineResult<Period> {
        match self.period {
            Some(period)
                if self.state.is_ready()
                    && self.records.iter().any(|r| r.employee_id == employee_id) =>
            {
                Ok(period)
            }
            _ => Err(EngineError::EmployeeNotFound { employee_id }),
        }
    }

    fn check_ticket(&self, ticket: &ResolutionTicket) -> EngineResult<()> {
        let current = ticket.generation == self.generation
            && Some(ticket.period) == self.period
            && self.state.is_ready()
            && self.records.iter().any(|r| r.employee_id == ticket.employee_id);

        if current {
            Ok(())
        } else {
            Err(EngineError::StaleResult {
                employee_id: ticket.employee_id,
            })
        }
    }
}
