//! Page and per-employee status of a [`SalarySession`](super::SalarySession).

use serde::Serialize;

/// Page-level state of the salary listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// Nothing loaded yet.
    #[default]
    Idle,
    /// Attendance and profiles are being fetched.
    Loading,
    /// Rows are available.
    Ready,
    /// The month could not be loaded; no rows are shown.
    Error(String),
}

impl SessionState {
    /// Whether rows can be shown.
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready)
    }
}

/// Per-employee status within a loaded month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum EmployeeStatus {
    /// Data is current.
    #[default]
    Ready,
    /// A distance backfill is running.
    Resolving,
    /// The last fetch or backfill for this employee failed.
    Failed(String),
}
