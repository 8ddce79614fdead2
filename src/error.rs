//! Error types for the field payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while computing salaries or
//! talking to the backend collaborators.

use thiserror::Error;

/// The main error type for the field payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use field_payroll::error::EngineError;
///
/// let error = EngineError::Validation {
///     field: "full_days".to_string(),
///     message: "must not be negative".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid value for 'full_days': must not be negative");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A numeric or calendar input to the calculator was invalid.
    #[error("Invalid value for '{field}': {message}")]
    Validation {
        /// The input that was invalid.
        field: String,
        /// A description of what made the input invalid.
        message: String,
    },

    /// A collaborator call failed (network, auth, server error or bad payload).
    #[error("I/O error during {operation}: {message}")]
    Io {
        /// The collaborator operation that failed.
        operation: String,
        /// A description of the failure.
        message: String,
    },

    /// An anomaly resolution finished after its selection changed.
    ///
    /// This is not a failure: the result is discarded.
    #[error("Stale resolution result for employee {employee_id} discarded")]
    StaleResult {
        /// The employee whose resolution became stale.
        employee_id: i64,
    },

    /// The employee is not part of the loaded selection.
    #[error("Employee not found in current selection: {employee_id}")]
    EmployeeNotFound {
        /// The employee that was requested.
        employee_id: i64,
    },
}

impl EngineError {
    /// Shorthand for a validation error on `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an I/O error raised by `operation`.
    pub fn io(operation: impl Into<String>, message: impl ToString) -> Self {
        EngineError::Io {
            operation: operation.into(),
            message: message.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/payroll.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/payroll.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_validation_helper_builds_variant() {
        let error = EngineError::validation("car_rate", "must not be negative");
        assert_eq!(
            error.to_string(),
            "Invalid value for 'car_rate': must not be negative"
        );
    }

    #[test]
    fn test_io_error_displays_operation() {
        let error = EngineError::io("fetch_attendance", "connection refused");
        assert_eq!(
            error.to_string(),
            "I/O error during fetch_attendance: connection refused"
        );
    }

    #[test]
    fn test_stale_result_displays_employee() {
        let error = EngineError::StaleResult { employee_id: 42 };
        assert_eq!(
            error.to_string(),
            "Stale resolution result for employee 42 discarded"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_validation() -> EngineResult<()> {
            Err(EngineError::validation("month", "out of range"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_validation()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
