//! Calculation logic for the field payroll engine.
//!
//! This module contains the salary rules: calendar cutoff, worked-day
//! clamping, base salary proration, travel allowance with per-vehicle
//! rounding, dearness allowance with its elapsed-period ceiling, and the
//! combined breakdown with its audit trace.

mod base_salary;
mod calendar;
mod dearness_allowance;
mod payroll;
mod rounding;
mod travel_allowance;
mod worked_days;

pub use base_salary::base_salary;
pub use calendar::{days_in_month, effective_cutoff, period_cutoff};
pub use dearness_allowance::dearness_allowance;
pub use payroll::{DA_CLAMPED, PROFILE_MISSING, WORKED_DAYS_CLAMPED, calculate_payroll, total_salary};
pub use rounding::round_currency;
pub use travel_allowance::travel_allowance;
pub use worked_days::{HALF_DAY_WEIGHT, worked_days};
