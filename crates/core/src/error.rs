//! Error types for the numbering engine
//!
//! This module defines the error taxonomy surfaced to creation and
//! transition requests. We use `thiserror` for automatic `Display` and
//! `Error` trait implementations.
//!
//! A manual number that cannot be honored is always surfaced as an error;
//! the engine never silently substitutes "the next available number" for a
//! number the caller asked for.

use crate::status::DocumentStatus;
use crate::types::DocumentId;
use thiserror::Error;

/// Result type alias for numbering operations
pub type NumberingResult<T> = std::result::Result<T, NumberingError>;

/// Error taxonomy for numbering and status transitions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumberingError {
    /// Malformed input, or a manual number outside the bootstrap window
    #[error("validation failed: {reason}")]
    Validation {
        /// What was wrong with the request
        reason: String,
    },

    /// A manual number collides with an official document's bare number
    ///
    /// Never auto-resolved; the caller must pick a different number.
    #[error("document number {number} is already taken by an official document")]
    DuplicateNumber {
        /// The rendered number that is taken
        number: String,
    },

    /// Attempted transition not present in the state table
    #[error("status transition {from} -> {to} is not allowed")]
    InvalidTransition {
        /// Status the document is in
        from: DocumentStatus,
        /// Status that was requested
        to: DocumentStatus,
    },

    /// Document locked by a derived artifact (e.g. a converted quote)
    #[error("document {document_id} has a derived artifact and cannot change status")]
    TransitionLocked {
        /// The locked document
        document_id: DocumentId,
    },

    /// Allocation retry budget exhausted; safe to retry the whole request
    #[error("could not allocate a document number after {attempts} attempts")]
    AllocationFailed {
        /// Attempts made before giving up
        attempts: u32,
    },

    /// The scope has consumed every number the configured width can render
    #[error("sequence exhausted: reached the maximum number {max}")]
    SequenceExhausted {
        /// Highest value the width admits
        max: u32,
    },

    /// A temporary number was found at rest outside an active swap
    #[error("document {document_id} holds temporary number {number} outside an active swap")]
    InconsistentState {
        /// The stuck document
        document_id: DocumentId,
        /// The rendered temporary value
        number: String,
    },

    /// Persistence collaborator failure
    #[error("storage error: {0}")]
    Storage(String),
}

impl NumberingError {
    /// Build a validation error from anything displayable
    pub fn validation(reason: impl Into<String>) -> Self {
        NumberingError::Validation {
            reason: reason.into(),
        }
    }

    /// Build a storage error from anything displayable
    pub fn storage(reason: impl Into<String>) -> Self {
        NumberingError::Storage(reason.into())
    }

    /// Whether this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, NumberingError::Validation { .. })
    }

    /// Whether this is a duplicate-number error
    pub fn is_duplicate(&self) -> bool {
        matches!(self, NumberingError::DuplicateNumber { .. })
    }

    /// Whether this is an invalid-transition error (table miss or lock)
    pub fn is_invalid_transition(&self) -> bool {
        matches!(
            self,
            NumberingError::InvalidTransition { .. } | NumberingError::TransitionLocked { .. }
        )
    }

    /// Whether this is an exhausted-allocation error
    pub fn is_allocation_failed(&self) -> bool {
        matches!(self, NumberingError::AllocationFailed { .. })
    }

    /// Whether this is a storage error
    pub fn is_storage_error(&self) -> bool {
        matches!(self, NumberingError::Storage(_))
    }
}
