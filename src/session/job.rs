//! Detached anomaly resolutions.
//!
//! A [`ResolutionJob`] owns everything it needs, so it can run on any task
//! while the session keeps serving reads and period changes. Its outcome is
//! handed back to [`SalarySession::complete_resolution`], which checks the
//! ticket against the current selection before applying anything.
//!
//! [`SalarySession::complete_resolution`]: super::SalarySession::complete_resolution

use std::sync::Arc;

use tracing::warn;

use crate::anomaly::{AnomalyResolver, ResolutionResult};
use crate::models::{Period, TravelAllowanceDetail};
use crate::sources::TravelAllowanceSource;

/// Identifies the selection a job was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionTicket {
    pub(super) generation: u64,
    pub(super) period: Period,
    pub(super) employee_id: i64,
}

impl ResolutionTicket {
    /// The employee being resolved.
    pub fn employee_id(&self) -> i64 {
        self.employee_id
    }

    /// The month being resolved.
    pub fn period(&self) -> Period {
        self.period
    }
}

/// An anomaly resolution for one employee, ready to run.
pub struct ResolutionJob {
    pub(super) ticket: ResolutionTicket,
    pub(super) detail: TravelAllowanceDetail,
    pub(super) resolver: AnomalyResolver,
    pub(super) travel: Arc<dyn TravelAllowanceSource>,
}

impl ResolutionJob {
    /// The selection this job belongs to.
    pub fn ticket(&self) -> ResolutionTicket {
        self.ticket
    }

    /// Backfills the anomalous days, then re-reads the month from the source.
    ///
    /// If the re-read fails the resolver's own updated detail is used.
    pub async fn run(self) -> ResolutionOutcome {
        let ResolutionTicket {
            period,
            employee_id,
            ..
        } = self.ticket;

        let result = self.resolver.resolve(employee_id, &self.detail).await;

        let (detail, refreshed) = match self
            .travel
            .fetch_travel_allowance(employee_id, period.first_day(), period.last_day())
            .await
        {
            Ok(detail) => (detail, true),
            Err(e) => {
                warn!(employee_id, period = %period, error = %e, "Refresh after resolution failed");
                (result.detail.clone(), false)
            }
        };

        ResolutionOutcome {
            ticket: self.ticket,
            result,
            detail,
            refreshed,
        }
    }
}

/// The finished work of a [`ResolutionJob`].
#[derive(Debug, Clone)]
pub struct ResolutionOutcome {
    /// The selection the job was started for.
    pub ticket: ResolutionTicket,
    /// Per-day results of the backfill.
    pub result: ResolutionResult,
    /// The detail to store for the employee.
    pub detail: TravelAllowanceDetail,
    /// Whether `detail` was re-read from the source.
    pub refreshed: bool,
}

/// What [`SalarySession::complete_resolution`](super::SalarySession::complete_resolution) did with an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionApplied {
    /// The employee's travel data was replaced.
    Applied {
        /// The resolved employee.
        employee_id: i64,
        /// Days still flagged after the update.
        remaining_anomalies: usize,
    },
    /// The selection changed while the job ran; nothing was touched.
    Discarded {
        /// The employee the job was for.
        employee_id: i64,
    },
}
