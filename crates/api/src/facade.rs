//! NumberingFacade: the single entry point for document resolvers
//!
//! Every facade call is one engine call pattern: draft targets go to the
//! issuer, everything else goes through the state machine. Input
//! validation lives here so the engine below only ever sees well-formed
//! numbers.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use gapless_core::{
    BareNumber, ConversionTracker, DocumentId, DocumentStatus, DocumentStore, NumberingError,
    NumberingResult,
};
use gapless_engine::{EngineConfig, NumberingEngine, RepairReport};

use crate::request::{Allocation, AllocationRequest, TransitionOutcome};

/// Single entry point exposed to document-creation/update collaborators
pub struct NumberingFacade {
    engine: NumberingEngine,
}

impl NumberingFacade {
    /// Create a facade over a store and a conversion tracker
    pub fn new(
        store: Arc<dyn DocumentStore>,
        tracker: Arc<dyn ConversionTracker>,
        config: EngineConfig,
    ) -> Self {
        Self {
            engine: NumberingEngine::new(store, tracker, config),
        }
    }

    /// Facade with default config and no conversion locking
    pub fn with_defaults(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            engine: NumberingEngine::with_defaults(store),
        }
    }

    /// Allocate a number for the request's target status
    ///
    /// Draft targets return a placeholder with no side effects; official
    /// targets run the transition and persist number and status together.
    ///
    /// # Errors
    ///
    /// `Validation` for malformed manual numbers, a missing document id on
    /// an official target, or a manual number outside the bootstrap
    /// window; `DuplicateNumber` when a manual number is already held
    /// officially; transition and allocation errors pass through.
    pub fn allocate(&self, request: AllocationRequest) -> NumberingResult<Allocation> {
        let scope = request.scope();
        let prefix = request
            .prefix
            .clone()
            .unwrap_or_else(|| Utc::now().format("%Y-%m").to_string());
        let manual = request
            .manual_number
            .as_deref()
            .map(parse_manual_number)
            .transpose()?;

        if request.target_status == DocumentStatus::Draft {
            let number = self.engine.issue_draft_number(&scope, manual)?;
            debug!(scope = %scope, number = %number, "issued draft placeholder");
            return Ok(Allocation { number, prefix });
        }

        let document_id = request.document_id.ok_or_else(|| {
            NumberingError::validation("official allocation requires a document id")
        })?;

        if let Some(manual) = manual {
            // A collision with an official document outranks the
            // bootstrap rule: the caller should hear which number is
            // taken, not that manual numbers are closed.
            if self.engine.official_holder(&scope, manual)?.is_some() {
                return Err(NumberingError::DuplicateNumber {
                    number: manual.to_string(),
                });
            }
            if self.engine.scope_has_official(&scope)? {
                return Err(NumberingError::validation(
                    "manual numbers are only accepted for the first official document in a scope",
                ));
            }
        }

        let record = self.engine.transition_with_number(
            &document_id,
            request.current_status,
            request.target_status,
            manual,
        )?;
        Ok(Allocation {
            number: record.number,
            prefix,
        })
    }

    /// Execute a status transition
    pub fn transition(
        &self,
        document_id: &DocumentId,
        from: DocumentStatus,
        to: DocumentStatus,
    ) -> NumberingResult<TransitionOutcome> {
        let record = self.engine.transition(document_id, from, to)?;
        Ok(TransitionOutcome {
            number: record.number,
            status: record.status,
        })
    }

    /// Repair documents stuck mid-swap (startup/health-check entrypoint)
    pub fn repair(&self) -> NumberingResult<RepairReport> {
        self.engine.repair()
    }
}

/// Validate a caller-typed manual number: 1-6 digits
fn parse_manual_number(input: &str) -> NumberingResult<BareNumber> {
    input
        .parse()
        .map_err(|err| NumberingError::validation(format!("manual number rejected: {}", err)))
}
