//! MemoryStore: in-process storage backend
//!
//! This module implements the DocumentStore trait using:
//! - `BTreeMap<DocumentId, Document>` for the document records
//! - a secondary index `(ScopeKey, BareNumber) -> DocumentId` acting as the
//!   unique constraint over bare numbers
//! - `parking_lot::RwLock` for thread-safe access
//!
//! # Design Notes
//!
//! - **Index is the invariant of record**: every write that would give a
//!   second document in a scope the same bare number is refused with
//!   `WriteOutcome::Conflict` before anything is mutated. The engine's
//!   optimistic retry loop handles the conflict.
//! - **Index and data move together**: both live under one write lock, so a
//!   reader never observes a bare number without its index entry.
//! - **Single process only**: an engine sharing documents across processes
//!   needs a backend whose conflict check runs inside the database
//!   (a unique index plus transactional writes); this backend is for
//!   embedded and test deployments.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use tracing::debug;

use gapless_core::{
    BareNumber, Document, DocumentId, DocumentNumber, DocumentStatus, DocumentStore,
    NumberingError, NumberingResult, ScopeKey, WriteOutcome,
};

/// In-memory document store with a unique bare-number index
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    docs: BTreeMap<DocumentId, Document>,
    /// Unique constraint: at most one holder per (scope, bare number).
    /// Drafts never hold bare-shaped numbers at rest, so indexing every
    /// bare number is the same as indexing the official ones.
    bare_index: HashMap<(ScopeKey, BareNumber), DocumentId>,
}

impl Inner {
    fn conflicts(&self, scope: &ScopeKey, number: &DocumentNumber, id: &DocumentId) -> bool {
        let DocumentNumber::Bare(bare) = number else {
            return false;
        };
        match self.bare_index.get(&(*scope, *bare)) {
            Some(holder) => holder != id,
            None => false,
        }
    }

    /// Apply a number (and optionally a status) to an existing document,
    /// keeping the index in sync. Caller has already checked for conflicts.
    fn apply(
        &mut self,
        id: &DocumentId,
        number: DocumentNumber,
        status: Option<DocumentStatus>,
    ) -> NumberingResult<()> {
        let doc = self
            .docs
            .get_mut(id)
            .ok_or_else(|| NumberingError::storage(format!("unknown document {}", id)))?;
        let scope = doc.scope();
        let old = doc.number.clone();
        doc.number = number.clone();
        if let Some(status) = status {
            doc.status = status;
        }
        if let DocumentNumber::Bare(old) = old {
            self.bare_index.remove(&(scope, old));
        }
        if let DocumentNumber::Bare(new) = number {
            self.bare_index.insert((scope, new), *id);
        }
        Ok(())
    }
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents held (all scopes)
    pub fn len(&self) -> usize {
        self.inner.read().docs.len()
    }

    /// Whether the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.inner.read().docs.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, id: &DocumentId) -> NumberingResult<Option<Document>> {
        Ok(self.inner.read().docs.get(id).cloned())
    }

    fn insert(&self, document: Document) -> NumberingResult<WriteOutcome> {
        let mut inner = self.inner.write();
        if inner.docs.contains_key(&document.id) {
            return Err(NumberingError::storage(format!(
                "document {} already exists",
                document.id
            )));
        }
        if inner.conflicts(&document.scope(), &document.number, &document.id) {
            return Ok(WriteOutcome::Conflict);
        }
        if let DocumentNumber::Bare(bare) = &document.number {
            inner.bare_index.insert((document.scope(), *bare), document.id);
        }
        debug!(id = %document.id, number = %document.number, "insert document");
        inner.docs.insert(document.id, document);
        Ok(WriteOutcome::Applied)
    }

    fn scan_scope(&self, scope: &ScopeKey) -> NumberingResult<Vec<Document>> {
        Ok(self
            .inner
            .read()
            .docs
            .values()
            .filter(|d| d.scope() == *scope)
            .cloned()
            .collect())
    }

    fn write_number(
        &self,
        id: &DocumentId,
        number: DocumentNumber,
    ) -> NumberingResult<WriteOutcome> {
        let mut inner = self.inner.write();
        let scope = match inner.docs.get(id) {
            Some(doc) => doc.scope(),
            None => {
                return Err(NumberingError::storage(format!("unknown document {}", id)));
            }
        };
        if inner.conflicts(&scope, &number, id) {
            return Ok(WriteOutcome::Conflict);
        }
        debug!(id = %id, number = %number, "rewrite number");
        inner.apply(id, number, None)?;
        Ok(WriteOutcome::Applied)
    }

    fn commit_transition(
        &self,
        id: &DocumentId,
        number: DocumentNumber,
        status: DocumentStatus,
    ) -> NumberingResult<WriteOutcome> {
        let mut inner = self.inner.write();
        let scope = match inner.docs.get(id) {
            Some(doc) => doc.scope(),
            None => {
                return Err(NumberingError::storage(format!("unknown document {}", id)));
            }
        };
        if inner.conflicts(&scope, &number, id) {
            return Ok(WriteOutcome::Conflict);
        }
        debug!(id = %id, number = %number, status = %status, "commit transition");
        inner.apply(id, number, Some(status))?;
        Ok(WriteOutcome::Applied)
    }

    fn scan_temporary(&self) -> NumberingResult<Vec<Document>> {
        Ok(self
            .inner
            .read()
            .docs
            .values()
            .filter(|d| d.number.is_temporary())
            .cloned()
            .collect())
    }
}
