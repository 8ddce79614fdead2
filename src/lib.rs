//! Salary and travel-allowance engine for field-sales teams.
//!
//! This crate turns monthly attendance summaries into salary breakdowns and
//! repairs days whose travel distance was never recorded. The calculator is
//! a set of pure functions over [`rust_decimal::Decimal`]; everything that
//! talks to the outside world sits behind the collaborator traits in
//! [`sources`].
//!
//! - [`calculation`]: cutoff, worked days, base salary, travel and dearness
//!   allowance, and the full [`calculation::calculate_payroll`] breakdown
//! - [`anomaly`]: detection and routing-based backfill of missing distances
//! - [`session`]: one selected month with its rows, cache and resolutions
//! - [`report`]: sorting, field-officer filter and pagination of the rows

#![warn(missing_docs)]

pub mod anomaly;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod session;
pub mod sources;
