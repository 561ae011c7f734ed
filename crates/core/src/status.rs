//! Document lifecycle status
//!
//! The status decides which number shape a document may hold at rest:
//! drafts hold tagged placeholders, every other status holds a bare number.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    /// Freely editable, holds a placeholder number
    Draft,
    /// Finalized and numbered, awaiting completion
    Pending,
    /// Terminal: number frozen, document immutable
    Completed,
    /// Terminal: voided but keeps its number
    Canceled,
}

impl DocumentStatus {
    /// Whether this status makes a document official
    ///
    /// Official documents hold bare numbers and participate in the
    /// uniqueness invariant; drafts do not.
    pub fn is_official(&self) -> bool {
        !matches!(self, DocumentStatus::Draft)
    }

    /// Whether this status admits no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Completed | DocumentStatus::Canceled)
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "DRAFT",
            DocumentStatus::Pending => "PENDING",
            DocumentStatus::Completed => "COMPLETED",
            DocumentStatus::Canceled => "CANCELED",
        }
    }

    /// All statuses, for exhaustive table checks
    pub fn all() -> [DocumentStatus; 4] {
        [
            DocumentStatus::Draft,
            DocumentStatus::Pending,
            DocumentStatus::Completed,
            DocumentStatus::Canceled,
        ]
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
