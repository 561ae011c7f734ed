//! NumberingEngine: wires the components over one store
//!
//! One engine instance serves every workspace; all per-request state lives
//! in the store, so any number of engine instances over the same store
//! agree, subject to the store's conflict checking. The per-scope locks
//! only serialize within one process.

use std::sync::Arc;

use gapless_core::{
    BareNumber, ConversionTracker, DocumentId, DocumentNumber, DocumentStatus, DocumentStore,
    NoConversions, NumberingResult, ScopeKey,
};

use crate::config::EngineConfig;
use crate::draft::DraftNumberIssuer;
use crate::locks::ScopeLocks;
use crate::machine::{StatusTransitionStateMachine, TransitionRecord};
use crate::recovery::{RepairCoordinator, RepairReport};
use crate::scanner::SequenceScanner;

/// The document numbering and status-transition engine
pub struct NumberingEngine {
    scanner: SequenceScanner,
    issuer: DraftNumberIssuer,
    machine: StatusTransitionStateMachine,
    repairer: RepairCoordinator,
}

impl NumberingEngine {
    /// Create an engine over a store and a conversion tracker
    pub fn new(
        store: Arc<dyn DocumentStore>,
        tracker: Arc<dyn ConversionTracker>,
        config: EngineConfig,
    ) -> Self {
        let locks = Arc::new(ScopeLocks::new());
        Self {
            scanner: SequenceScanner::new(store.clone()),
            issuer: DraftNumberIssuer::new(store.clone()),
            machine: StatusTransitionStateMachine::new(
                store.clone(),
                tracker,
                locks.clone(),
                &config,
            ),
            repairer: RepairCoordinator::new(store, locks),
        }
    }

    /// Engine with default config and no conversion locking
    pub fn with_defaults(store: Arc<dyn DocumentStore>) -> Self {
        Self::new(store, Arc::new(NoConversions), EngineConfig::default())
    }

    /// Issue a placeholder number for a new draft
    ///
    /// No side effects; the caller persists the returned number as part of
    /// document creation.
    pub fn issue_draft_number(
        &self,
        scope: &ScopeKey,
        manual: Option<BareNumber>,
    ) -> NumberingResult<DocumentNumber> {
        self.issuer.issue(scope, manual)
    }

    /// Execute a status transition, (re)numbering where required
    pub fn transition(
        &self,
        document_id: &DocumentId,
        from: DocumentStatus,
        to: DocumentStatus,
    ) -> NumberingResult<TransitionRecord> {
        self.machine.execute(document_id, from, to, None)
    }

    /// Execute a transition with a caller-supplied target number
    ///
    /// Only allocation transitions consult the number; it is honored or
    /// refused, never silently replaced.
    pub fn transition_with_number(
        &self,
        document_id: &DocumentId,
        from: DocumentStatus,
        to: DocumentStatus,
        manual: Option<BareNumber>,
    ) -> NumberingResult<TransitionRecord> {
        self.machine.execute(document_id, from, to, manual)
    }

    /// The next number an official allocation in this scope would take
    pub fn next_official_number(&self, scope: &ScopeKey) -> NumberingResult<BareNumber> {
        self.scanner.next_official_number(scope)
    }

    /// Whether the scope already has official documents
    pub fn scope_has_official(&self, scope: &ScopeKey) -> NumberingResult<bool> {
        self.scanner.scope_has_official(scope)
    }

    /// The official document holding `number`, if any
    pub fn official_holder(
        &self,
        scope: &ScopeKey,
        number: BareNumber,
    ) -> NumberingResult<Option<DocumentId>> {
        self.scanner.official_holder(scope, number)
    }

    /// Repair documents stuck mid-swap (startup/health-check entrypoint)
    pub fn repair(&self) -> NumberingResult<RepairReport> {
        self.repairer.repair()
    }
}
