//! Core data models for the field payroll engine.
//!
//! This module contains the snapshots fetched from the backend (attendance,
//! employee profiles, travel-allowance details), the calendar [`Period`], and
//! the [`PayrollBreakdown`] produced by the calculator.

mod attendance;
mod de;
mod employee;
mod payroll_result;
mod period;
mod travel;

pub use attendance::{AttendanceRecord, AttendanceStats};
pub use employee::{EmployeeProfile, EmployeeProfiles};
pub use payroll_result::{AuditStep, AuditTrace, AuditWarning, PayrollBreakdown};
pub use period::Period;
pub use travel::{Coordinates, DateDetail, TravelAllowanceDetail, VehicleType, VisitDetail};
