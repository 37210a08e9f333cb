//! Errors surfaced by breeding command handlers.

use std::time::Duration;
use thiserror::Error;

use crate::domain::foundation::{CycleCode, DomainError, ErrorCode, ValidationError};

/// Why a proposed transition did not commit.
///
/// Nothing is persisted for any variant.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Transition rejected with {} violation(s)", .0.len())]
    Rejected(Vec<ValidationError>),

    #[error("Cycle {0} already has a transition in flight")]
    ConcurrentModification(CycleCode),

    #[error("Persistence did not complete within {0:?}")]
    PersistenceTimeout(Duration),

    #[error("Transition cancelled")]
    Cancelled,

    #[error("Cycle not found: {0}")]
    CycleNotFound(CycleCode),

    #[error("Storage failure: {0}")]
    Storage(#[from] DomainError),
}

impl TransitionError {
    /// Returns true if the same request may succeed when retried unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransitionError::ConcurrentModification(_)
                | TransitionError::PersistenceTimeout(_)
                | TransitionError::Storage(_)
        )
    }

    /// Returns the validation violations of a rejected request.
    pub fn violations(&self) -> &[ValidationError] {
        match self {
            TransitionError::Rejected(errors) => errors,
            _ => &[],
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            TransitionError::Rejected(_) => ErrorCode::ValidationFailed,
            TransitionError::ConcurrentModification(_) => ErrorCode::ConcurrentModification,
            TransitionError::PersistenceTimeout(_) => ErrorCode::PersistenceTimeout,
            TransitionError::Cancelled => ErrorCode::Cancelled,
            TransitionError::CycleNotFound(_) => ErrorCode::CycleNotFound,
            TransitionError::Storage(e) => e.code,
        }
    }
}

/// Why a new cycle could not be created.
#[derive(Debug, Error)]
pub enum CreateCycleError {
    #[error("Cycle rejected with {} violation(s)", .0.len())]
    Rejected(Vec<ValidationError>),

    #[error("Cycle {0} already exists")]
    AlreadyExists(CycleCode),

    #[error("Cycle {0} is already being written")]
    ConcurrentModification(CycleCode),

    #[error("Persistence did not complete within {0:?}")]
    PersistenceTimeout(Duration),

    #[error("Storage failure: {0}")]
    Storage(#[from] DomainError),
}
