//! DraftNumberIssuer: placeholder numbers for draft documents
//!
//! A draft's number previews where the document would land in the sequence
//! without consuming anything. The issuer only computes the string; the
//! caller persists it as part of document creation, so issuing has no side
//! effects and never needs the scope lock.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::debug;

use gapless_core::{
    BareNumber, DocumentNumber, DocumentStatus, DocumentStore, DraftTag, NumberingResult, ScopeKey,
};

use crate::scanner::SequenceScanner;

/// Milliseconds of jitter added to a stamp tag so two drafts created in the
/// same millisecond still diverge
const STAMP_JITTER_MS: i64 = 1_000;

/// Issues placeholder numbers for drafts
pub struct DraftNumberIssuer {
    store: Arc<dyn DocumentStore>,
    scanner: SequenceScanner,
}

impl DraftNumberIssuer {
    /// Create an issuer over the given store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let scanner = SequenceScanner::new(store.clone());
        Self { store, scanner }
    }

    /// Issue a placeholder for a new draft
    ///
    /// Uses the manual base when one was supplied (already shape-validated
    /// upstream), otherwise previews the scanner's next candidate. The
    /// plain `-DRAFT` tag is replaced with a millisecond stamp when another
    /// draft in the scope already renders identically.
    pub fn issue(
        &self,
        scope: &ScopeKey,
        manual: Option<BareNumber>,
    ) -> NumberingResult<DocumentNumber> {
        let base = match manual {
            Some(base) => base,
            None => self.scanner.next_official_number(scope)?,
        };
        let candidate = DocumentNumber::draft(base);
        if self.draft_holds(scope, &candidate)? {
            let stamped = DocumentNumber::DraftTagged {
                base,
                tag: DraftTag::Stamp(stamp_millis()),
            };
            debug!(scope = %scope, number = %stamped, "draft placeholder disambiguated");
            return Ok(stamped);
        }
        Ok(candidate)
    }

    /// Whether some draft in the scope already holds this exact rendering
    fn draft_holds(&self, scope: &ScopeKey, number: &DocumentNumber) -> NumberingResult<bool> {
        Ok(self
            .store
            .scan_scope(scope)?
            .iter()
            .any(|doc| doc.status == DocumentStatus::Draft && doc.number == *number))
    }
}

/// Epoch milliseconds plus jitter for stamp tags
fn stamp_millis() -> i64 {
    Utc::now().timestamp_millis() + rand::thread_rng().gen_range(0..STAMP_JITTER_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapless_core::{Document, DocumentKind, UserId, WorkspaceId};
    use gapless_storage::MemoryStore;

    fn setup() -> (Arc<MemoryStore>, DraftNumberIssuer, ScopeKey) {
        let store = Arc::new(MemoryStore::new());
        let issuer = DraftNumberIssuer::new(store.clone());
        let scope = ScopeKey::new(WorkspaceId::new(), DocumentKind::Quote);
        (store, issuer, scope)
    }

    fn persist_draft(store: &MemoryStore, scope: &ScopeKey, number: DocumentNumber) {
        store
            .insert(Document::new_draft(
                scope.workspace_id,
                scope.kind,
                "2026-08".to_string(),
                number,
                UserId::new(),
            ))
            .unwrap();
    }

    #[test]
    fn manual_base_becomes_plain_draft_tag() {
        let (_store, issuer, scope) = setup();
        let number = issuer
            .issue(&scope, Some(BareNumber::new(5).unwrap()))
            .unwrap();
        assert_eq!(number.to_string(), "000005-DRAFT");
    }

    #[test]
    fn without_manual_base_the_scanner_previews() {
        let (_store, issuer, scope) = setup();
        let number = issuer.issue(&scope, None).unwrap();
        assert_eq!(number.to_string(), "000001-DRAFT");
    }

    #[test]
    fn issuing_writes_nothing() {
        let (store, issuer, scope) = setup();
        issuer.issue(&scope, None).unwrap();
        issuer.issue(&scope, Some(BareNumber::new(9).unwrap())).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn colliding_placeholder_gets_a_stamp_tag() {
        let (store, issuer, scope) = setup();
        let base = BareNumber::new(5).unwrap();
        persist_draft(&store, &scope, DocumentNumber::draft(base));

        let number = issuer.issue(&scope, Some(base)).unwrap();
        match number {
            DocumentNumber::DraftTagged {
                base: b,
                tag: DraftTag::Stamp(millis),
            } => {
                assert_eq!(b, base);
                assert!(millis > 0);
            }
            other => panic!("expected stamped placeholder, got {}", other),
        }
    }

    #[test]
    fn placeholder_in_another_scope_does_not_collide() {
        let (store, issuer, scope) = setup();
        let other = ScopeKey::new(scope.workspace_id, DocumentKind::Invoice);
        let base = BareNumber::new(5).unwrap();
        persist_draft(&store, &other, DocumentNumber::draft(base));

        let number = issuer.issue(&scope, Some(base)).unwrap();
        assert_eq!(number.to_string(), "000005-DRAFT");
    }
}
