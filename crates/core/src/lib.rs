//! Core types and traits for the gapless numbering engine
//!
//! This crate defines the foundational pieces used throughout the system:
//! - Identifiers: DocumentId, WorkspaceId, UserId, DocumentKind, ScopeKey
//! - Number grammar: BareNumber, DraftTag, DocumentNumber
//! - Lifecycle: DocumentStatus, Document
//! - Error taxonomy: NumberingError, NumberingResult
//! - Collaborator traits: DocumentStore, ConversionTracker
//! - Limits: number width and retry budgets

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod limits;
pub mod number;
pub mod status;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use document::Document;
pub use error::{NumberingError, NumberingResult};
pub use limits::{MAX_ALLOCATION_ATTEMPTS, MAX_BARE_DIGITS, MAX_BARE_VALUE, NUMBER_WIDTH};
pub use number::{BareNumber, DocumentNumber, DraftTag, NumberParseError, DRAFT_TAG, TEMP_PREFIX};
pub use status::DocumentStatus;
pub use traits::{ConversionTracker, DocumentStore, NoConversions, WriteOutcome};
pub use types::{DocumentId, DocumentKind, ScopeKey, UserId, WorkspaceId};
