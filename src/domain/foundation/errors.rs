//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// A single rule violation found while checking a breeding cycle.
///
/// Validation never stops at the first problem: every rule is evaluated and
/// all violations are returned together so that callers can show complete
/// feedback in one round trip.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Gestation length of {days} days is outside the plausible range {min}..={max}")]
    ImplausibleGestation { days: i64, min: i64, max: i64 },

    #[error("Field '{later}' must not be earlier than '{earlier}'")]
    ChronologyViolation { earlier: String, later: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        actual: f64,
    },

    #[error("Sub-record '{subrecord}' is incomplete: {detail}")]
    IncompleteSubrecord { subrecord: String, detail: String },
}

impl ValidationError {
    /// Creates an invalid transition error.
    pub fn invalid_transition(from: impl fmt::Display, to: impl fmt::Display) -> Self {
        ValidationError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Creates an implausible gestation error.
    pub fn implausible_gestation(days: i64, min: i64, max: i64) -> Self {
        ValidationError::ImplausibleGestation { days, min, max }
    }

    /// Creates a chronology violation: `later` was found before `earlier`.
    pub fn chronology(earlier: impl Into<String>, later: impl Into<String>) -> Self {
        ValidationError::ChronologyViolation {
            earlier: earlier.into(),
            later: later.into(),
        }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, actual: f64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an error for a sub-record that is absent altogether.
    pub fn missing_subrecord(subrecord: impl Into<String>) -> Self {
        ValidationError::IncompleteSubrecord {
            subrecord: subrecord.into(),
            detail: "sub-record is missing".to_string(),
        }
    }

    /// Creates an error for a sub-record whose content does not satisfy the target state.
    pub fn incomplete(subrecord: impl Into<String>, detail: impl Into<String>) -> Self {
        ValidationError::IncompleteSubrecord {
            subrecord: subrecord.into(),
            detail: detail.into(),
        }
    }

    /// Returns the error code matching this violation.
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            ValidationError::ImplausibleGestation { .. } => ErrorCode::ImplausibleGestation,
            ValidationError::ChronologyViolation { .. } => ErrorCode::ChronologyViolation,
            ValidationError::OutOfRange { .. } => ErrorCode::OutOfRange,
            ValidationError::IncompleteSubrecord { .. } => ErrorCode::IncompleteSubrecord,
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    InvalidTransition,
    ImplausibleGestation,
    ChronologyViolation,
    OutOfRange,
    IncompleteSubrecord,
    EmptyField,

    // Not found errors
    CycleNotFound,

    // Coordination errors
    ConcurrentModification,
    PersistenceTimeout,
    Cancelled,

    // Infrastructure errors
    DatabaseError,
    EventPublishFailed,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidTransition => "INVALID_TRANSITION",
            ErrorCode::ImplausibleGestation => "IMPLAUSIBLE_GESTATION",
            ErrorCode::ChronologyViolation => "CHRONOLOGY_VIOLATION",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::IncompleteSubrecord => "INCOMPLETE_SUBRECORD",
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::CycleNotFound => "CYCLE_NOT_FOUND",
            ErrorCode::ConcurrentModification => "CONCURRENT_MODIFICATION",
            ErrorCode::PersistenceTimeout => "PERSISTENCE_TIMEOUT",
            ErrorCode::Cancelled => "CANCELLED",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::EventPublishFailed => "EVENT_PUBLISH_FAILED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
///
/// Returned by ports when an external collaborator fails.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            details: HashMap::new(),
        }
        .with_detail("field", field.into())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_names_both_states() {
        let err = ValidationError::invalid_transition("weaned", "in_heat");
        assert_eq!(format!("{}", err), "Cannot transition from weaned to in_heat");
    }

    #[test]
    fn chronology_violation_names_both_fields() {
        let err = ValidationError::chronology("service_info.service_date", "calving_info.calving_date");
        assert_eq!(
            format!("{}", err),
            "Field 'calving_info.calving_date' must not be earlier than 'service_info.service_date'"
        );
    }

    #[test]
    fn out_of_range_displays_field_value_and_range() {
        let err = ValidationError::out_of_range("calf_info.birth_weight_kg", 15.0, 80.0, 92.5);
        assert_eq!(
            format!("{}", err),
            "Field 'calf_info.birth_weight_kg' must be between 15 and 80, got 92.5"
        );
    }

    #[test]
    fn missing_subrecord_displays_correctly() {
        let err = ValidationError::missing_subrecord("service_info");
        assert_eq!(
            format!("{}", err),
            "Sub-record 'service_info' is incomplete: sub-record is missing"
        );
    }

    #[test]
    fn validation_error_maps_to_code() {
        assert_eq!(
            ValidationError::implausible_gestation(120, 150, 400).code(),
            ErrorCode::ImplausibleGestation
        );
        assert_eq!(
            ValidationError::incomplete("cull_info", "reason is empty").code(),
            ErrorCode::IncompleteSubrecord
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::CycleNotFound, "Cycle not found");
        assert_eq!(format!("{}", err), "[CYCLE_NOT_FOUND] Cycle not found");
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::new(ErrorCode::DatabaseError, "Write failed")
            .with_detail("cycle_code", "BC-2024-001")
            .with_detail("reason", "connection reset");

        assert_eq!(err.details.get("cycle_code"), Some(&"BC-2024-001".to_string()));
        assert_eq!(err.details.get("reason"), Some(&"connection reset".to_string()));
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::ConcurrentModification), "CONCURRENT_MODIFICATION");
        assert_eq!(format!("{}", ErrorCode::PersistenceTimeout), "PERSISTENCE_TIMEOUT");
    }
}
