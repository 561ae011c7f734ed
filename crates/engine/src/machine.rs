//! StatusTransitionStateMachine: validates and executes transitions
//!
//! One table serves all three document kinds; the engine is parameterized
//! by kind instead of duplicating the logic per kind. Only two transitions
//! touch numbering: leaving draft allocates an official number, returning
//! to draft frees one. Completed and canceled documents refuse everything.

use std::sync::Arc;

use tracing::warn;

use gapless_core::{
    BareNumber, ConversionTracker, Document, DocumentId, DocumentKind, DocumentNumber,
    DocumentStatus, DocumentStore, NumberingError, NumberingResult,
};

use crate::config::EngineConfig;
use crate::draft::DraftNumberIssuer;
use crate::locks::ScopeLocks;
use crate::scanner::SequenceScanner;
use crate::swap::{ConflictSwapper, SwapOutcome, TargetOrigin};

/// What a transition does to the document's number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberingAction {
    /// Allocate an official bare number (scanner + swapper)
    AllocateOfficial,
    /// Replace the bare number with a placeholder, freeing it
    RevertToDraft,
    /// Keep the number, change only the status
    KeepNumber,
}

/// Look up a transition in the state table
///
/// Returns None for transitions that are not allowed. All kinds currently
/// share one table; the kind parameter is where a kind-specific terminal
/// rule would hook in.
pub fn action_for(
    kind: DocumentKind,
    from: DocumentStatus,
    to: DocumentStatus,
) -> Option<NumberingAction> {
    use DocumentStatus::{Canceled, Completed, Draft, Pending};
    match kind {
        DocumentKind::Quote | DocumentKind::Invoice | DocumentKind::CreditNote => {
            match (from, to) {
                (Draft, Pending) => Some(NumberingAction::AllocateOfficial),
                (Pending, Completed) => Some(NumberingAction::KeepNumber),
                (Pending, Canceled) => Some(NumberingAction::KeepNumber),
                (Pending, Draft) => Some(NumberingAction::RevertToDraft),
                _ => None,
            }
        }
    }
}

/// Outcome of a successful transition
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRecord {
    /// The number the document holds after the transition
    pub number: DocumentNumber,
    /// The status the document is in after the transition
    pub status: DocumentStatus,
}

/// Validates and executes status transitions
pub struct StatusTransitionStateMachine {
    store: Arc<dyn DocumentStore>,
    tracker: Arc<dyn ConversionTracker>,
    locks: Arc<ScopeLocks>,
    scanner: SequenceScanner,
    issuer: DraftNumberIssuer,
    swapper: ConflictSwapper,
    max_attempts: u32,
}

impl StatusTransitionStateMachine {
    /// Create a state machine over the given collaborators
    pub fn new(
        store: Arc<dyn DocumentStore>,
        tracker: Arc<dyn ConversionTracker>,
        locks: Arc<ScopeLocks>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            scanner: SequenceScanner::new(store.clone()),
            issuer: DraftNumberIssuer::new(store.clone()),
            swapper: ConflictSwapper::new(store.clone()),
            store,
            tracker,
            locks,
            max_attempts: config.max_attempts,
        }
    }

    /// Execute a transition, (re)numbering the document where the table
    /// says so
    ///
    /// `manual` is only consulted for transitions that allocate; a manual
    /// number that cannot be honored is an error, never silently replaced.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` for table misses and stale `from` statuses,
    /// `TransitionLocked` for documents with derived artifacts,
    /// `DuplicateNumber`/`AllocationFailed` from the numbering path.
    pub fn execute(
        &self,
        document_id: &DocumentId,
        from: DocumentStatus,
        to: DocumentStatus,
        manual: Option<BareNumber>,
    ) -> NumberingResult<TransitionRecord> {
        let document = self
            .store
            .get(document_id)?
            .ok_or_else(|| NumberingError::storage(format!("unknown document {}", document_id)))?;

        // A stale `from` means the caller lost a race; report the
        // transition that would actually run.
        if document.status != from {
            return Err(NumberingError::InvalidTransition {
                from: document.status,
                to,
            });
        }

        if self.tracker.is_conversion_locked(document_id)? {
            return Err(NumberingError::TransitionLocked {
                document_id: *document_id,
            });
        }

        let action = action_for(document.kind, from, to)
            .ok_or(NumberingError::InvalidTransition { from, to })?;

        match action {
            NumberingAction::AllocateOfficial => self.allocate_official(&document, to, manual),
            NumberingAction::RevertToDraft => self.revert_to_draft(&document, to),
            NumberingAction::KeepNumber => self.keep_number(&document, to),
        }
    }

    /// Draft leaves draft state: claim an official number
    fn allocate_official(
        &self,
        document: &Document,
        to: DocumentStatus,
        manual: Option<BareNumber>,
    ) -> NumberingResult<TransitionRecord> {
        let scope = document.scope();
        self.locks.with_scope(&scope, || {
            for attempt in 1..=self.max_attempts {
                let (target, origin) = match manual {
                    Some(number) => (number, TargetOrigin::Manual),
                    None => (
                        self.scanner.next_official_number(&scope)?,
                        TargetOrigin::Scanner,
                    ),
                };
                match self.swapper.resolve_and_assign(document, target, origin)? {
                    SwapOutcome::Assigned(number) => {
                        let committed = self.store.commit_transition(
                            &document.id,
                            DocumentNumber::Bare(number),
                            to,
                        )?;
                        if committed.is_conflict() {
                            warn!(scope = %scope, attempt, "commit lost the slot, retrying");
                            continue;
                        }
                        return Ok(TransitionRecord {
                            number: DocumentNumber::Bare(number),
                            status: to,
                        });
                    }
                    SwapOutcome::Contended => {
                        warn!(scope = %scope, attempt, "allocation contended, retrying");
                    }
                }
            }
            Err(NumberingError::AllocationFailed {
                attempts: self.max_attempts,
            })
        })
    }

    /// Pending returns to draft: free the bare number behind a placeholder
    fn revert_to_draft(
        &self,
        document: &Document,
        to: DocumentStatus,
    ) -> NumberingResult<TransitionRecord> {
        let DocumentNumber::Bare(base) = document.number else {
            // A pending document without a bare number is a swap that
            // never finished; the repair pass owns that.
            return Err(NumberingError::InconsistentState {
                document_id: document.id,
                number: document.number.to_string(),
            });
        };
        let scope = document.scope();
        self.locks.with_scope(&scope, || {
            let placeholder = self.issuer.issue(&scope, Some(base))?;
            // Placeholders are never bare-shaped, so this cannot conflict.
            self.store
                .commit_transition(&document.id, placeholder.clone(), to)?;
            Ok(TransitionRecord {
                number: placeholder,
                status: to,
            })
        })
    }

    /// Status-only transition: the number is frozen
    fn keep_number(
        &self,
        document: &Document,
        to: DocumentStatus,
    ) -> NumberingResult<TransitionRecord> {
        if document.number.is_temporary() {
            return Err(NumberingError::InconsistentState {
                document_id: document.id,
                number: document.number.to_string(),
            });
        }
        self.store
            .commit_transition(&document.id, document.number.clone(), to)?;
        Ok(TransitionRecord {
            number: document.number.clone(),
            status: to,
        })
    }
}
