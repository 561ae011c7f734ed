//! Collaborator traits for the numbering engine
//!
//! This module defines the seams to the rest of the platform:
//! - `DocumentStore`: the persistence collaborator the engine allocates
//!   against
//! - `ConversionTracker`: the collaborator that knows whether a document
//!   already has a derived artifact (a converted quote, an amended invoice)
//!
//! Thread safety: the engine serves concurrent requests, so implementations
//! must be safe to call from multiple threads (`Send + Sync`).

use crate::document::Document;
use crate::error::NumberingResult;
use crate::number::DocumentNumber;
use crate::status::DocumentStatus;
use crate::types::{DocumentId, ScopeKey};

/// Result of a conflict-checked write
///
/// The store is the invariant of record: any write that would leave two
/// documents in one scope holding the same bare number is refused with
/// `Conflict` instead of being applied. The engine's retry loop re-scans
/// and re-attempts on conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The write was applied
    Applied,
    /// The write would have duplicated a bare number and was refused
    Conflict,
}

impl WriteOutcome {
    /// Whether the write was refused
    pub fn is_conflict(&self) -> bool {
        matches!(self, WriteOutcome::Conflict)
    }
}

/// Persistence abstraction for documents
///
/// The engine holds no numbering state of its own between requests; every
/// decision is derived from what this trait returns. Implementations must
/// apply each method atomically with respect to concurrent calls.
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by id
    ///
    /// Returns None if no such document exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn get(&self, id: &DocumentId) -> NumberingResult<Option<Document>>;

    /// Insert a newly created document
    ///
    /// Conflict-checked like every write: inserting a document whose bare
    /// number is already held in its scope returns `Conflict`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails or the id is
    /// already present.
    fn insert(&self, document: Document) -> NumberingResult<WriteOutcome>;

    /// All documents of one scope, in no particular order
    ///
    /// The scanner derives the next sequence value from this; the issuer
    /// and swapper use it for collision detection.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn scan_scope(&self, scope: &ScopeKey) -> NumberingResult<Vec<Document>>;

    /// Rewrite a document's number, leaving its status untouched
    ///
    /// Used for the intermediate steps of the swap.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not exist or the storage
    /// operation fails.
    fn write_number(
        &self,
        id: &DocumentId,
        number: DocumentNumber,
    ) -> NumberingResult<WriteOutcome>;

    /// Write a document's number and status in one atomic step
    ///
    /// A transition's final number must never be observable without its new
    /// status or vice versa; this is the only way the engine commits one.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not exist or the storage
    /// operation fails.
    fn commit_transition(
        &self,
        id: &DocumentId,
        number: DocumentNumber,
        status: DocumentStatus,
    ) -> NumberingResult<WriteOutcome>;

    /// All documents currently holding a temporary number, across scopes
    ///
    /// Feeds the startup/health-check repair pass. Empty in a healthy
    /// store: temporary values must only exist mid-swap.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn scan_temporary(&self) -> NumberingResult<Vec<Document>>;
}

/// Knows whether a document is locked by a derived artifact
///
/// Supplied by the conversion-tracking collaborator. A locked document
/// refuses every status transition before the transition table is even
/// consulted.
pub trait ConversionTracker: Send + Sync {
    /// Whether the given document has a derived artifact
    ///
    /// # Errors
    ///
    /// Returns an error if the collaborator cannot be reached.
    fn is_conversion_locked(&self, id: &DocumentId) -> NumberingResult<bool>;
}

/// A tracker that locks nothing
///
/// Default wiring for deployments without document conversion, and for
/// tests that are not about the lock.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConversions;

impl ConversionTracker for NoConversions {
    fn is_conversion_locked(&self, _id: &DocumentId) -> NumberingResult<bool> {
        Ok(false)
    }
}
