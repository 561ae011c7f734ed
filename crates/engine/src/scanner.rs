//! SequenceScanner: derives the next official number for a scope
//!
//! The sequence has no dedicated counter row; the next value is re-derived
//! on every allocation as max+1 over the bare numbers official documents
//! already hold. Drafts never contribute, whatever their placeholder
//! previews. The scanner alone is racy by construction; callers combine it
//! with the conflict-checked write and the per-scope lock.

use std::sync::Arc;

use gapless_core::{
    BareNumber, DocumentStore, NumberingError, NumberingResult, ScopeKey, MAX_BARE_VALUE,
};

/// Computes next-candidate official numbers for a scope
pub struct SequenceScanner {
    store: Arc<dyn DocumentStore>,
}

impl SequenceScanner {
    /// Create a scanner over the given store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Next candidate official number: max existing + 1, or 1
    ///
    /// Not gap-filling: a canceled document keeps its number and the hole a
    /// deleted pending document leaves is never reused.
    ///
    /// # Errors
    ///
    /// `SequenceExhausted` once the scope has consumed the highest value
    /// the configured width can render.
    pub fn next_official_number(&self, scope: &ScopeKey) -> NumberingResult<BareNumber> {
        let highest = self
            .store
            .scan_scope(scope)?
            .iter()
            .filter_map(|doc| doc.official_number())
            .max();
        match highest {
            None => Ok(BareNumber::FIRST),
            Some(n) => n.succ().ok_or(NumberingError::SequenceExhausted {
                max: MAX_BARE_VALUE,
            }),
        }
    }

    /// Whether any official document exists in the scope
    ///
    /// Gates the bootstrap exception: manual official numbers are only
    /// honored while this is false.
    pub fn scope_has_official(&self, scope: &ScopeKey) -> NumberingResult<bool> {
        Ok(self
            .store
            .scan_scope(scope)?
            .iter()
            .any(|doc| doc.status.is_official()))
    }

    /// The official document currently holding `number`, if any
    pub fn official_holder(
        &self,
        scope: &ScopeKey,
        number: BareNumber,
    ) -> NumberingResult<Option<gapless_core::DocumentId>> {
        Ok(self
            .store
            .scan_scope(scope)?
            .iter()
            .find(|doc| doc.official_number() == Some(number))
            .map(|doc| doc.id))
    }
}
