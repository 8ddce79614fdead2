//! Payroll result models for the field payroll engine.
//!
//! This module contains the [`PayrollBreakdown`] type and the audit structures
//! that record how each figure was derived.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Period;

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
///
/// # Example
///
/// ```
/// use field_payroll::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "worked_days".to_string(),
///     rule_name: "Worked Days".to_string(),
///     input: serde_json::json!({"full_days": "20", "half_days": "2", "cutoff": 31}),
///     output: serde_json::json!({"worked_days": "21"}),
///     reasoning: "20 + 2 x 0.5 = 21".to_string(),
/// };
/// assert_eq!(step.rule_id, "worked_days");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention, such as a clamp absorbing suspicious data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        }
    }
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The salary breakdown for one employee and month.
///
/// All currency figures are whole units. `total_salary` is the sum of the
/// three computed components and the approved expense, rounded once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollBreakdown {
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The employee the breakdown is for.
    pub employee_id: i64,
    /// The month the breakdown covers.
    pub period: Period,
    /// The last day whose attendance counts.
    pub cutoff: u32,
    /// Calendar days in the month.
    pub days_in_month: u32,
    /// Attendance days after the cutoff clamp.
    pub worked_days: Decimal,
    /// Prorated monthly salary.
    pub base_salary: Decimal,
    /// Car and bike reimbursement.
    pub travel_allowance: Decimal,
    /// Dearness allowance for the attended days.
    pub dearness_allowance: Decimal,
    /// Reimbursed expenses, as reported.
    pub approved_expense: Decimal,
    /// The payable total.
    pub total_salary: Decimal,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}
