//! ConflictSwapper: moves a bare number from a draft holder to a claimer
//!
//! A draft holding `000007-DRAFT` informally reserves 7; when another
//! document officially claims 7, the draft must be renamed without any
//! intermediate state where two documents compete for the slot. A direct
//! two-way rename would do exactly that, so the swap goes through
//! temporaries:
//!
//! 1. holder: `000007-DRAFT` -> `TEMP-000007-<token>`
//! 2. claimer: old number -> `TEMP-000007-<token>` -> bare `000007`
//! 3. holder: `TEMP-000007-<token>` -> `000007-DRAFT` (re-tagged if taken)
//!
//! The claimer parks on its own temporary before taking the bare slot so a
//! crash between the two writes never leaves it without a persisted
//! number. The target base is embedded in every temporary so the repair
//! pass can tell what an interrupted swap was doing.
//!
//! Every entry point expects the scope lock to be held by the caller.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, warn};

use gapless_core::{
    BareNumber, Document, DocumentNumber, DocumentStatus, DocumentStore, DraftTag, NumberingError,
    NumberingResult,
};

use crate::draft::DraftNumberIssuer;
use crate::scanner::SequenceScanner;

/// Where an allocation target came from
///
/// Manual targets belong to the caller: a collision with an official
/// document surfaces as `DuplicateNumber` instead of being papered over
/// with the next free number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOrigin {
    /// The caller asked for this exact number
    Manual,
    /// The scanner computed this candidate
    Scanner,
}

/// Result of one swap attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The claimer now holds the bare number (status not yet committed)
    Assigned(BareNumber),
    /// An intermediate write lost a race; re-run detection and try again
    Contended,
}

/// Resolves collisions on a bare number and assigns it to a claimer
pub struct ConflictSwapper {
    store: Arc<dyn DocumentStore>,
    scanner: SequenceScanner,
    issuer: DraftNumberIssuer,
}

impl ConflictSwapper {
    /// Create a swapper over the given store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let scanner = SequenceScanner::new(store.clone());
        let issuer = DraftNumberIssuer::new(store.clone());
        Self {
            store,
            scanner,
            issuer,
        }
    }

    /// Assign `target` to `claimer`, swapping away a draft holder if needed
    ///
    /// On success the claimer holds the returned bare number; the caller
    /// commits it together with the new status. `Contended` means the
    /// attempt lost a race and detection should re-run; the caller owns
    /// the retry budget.
    ///
    /// # Errors
    ///
    /// `DuplicateNumber` when a manual target is held by an official
    /// document; storage errors pass through.
    pub fn resolve_and_assign(
        &self,
        claimer: &Document,
        target: BareNumber,
        origin: TargetOrigin,
    ) -> NumberingResult<SwapOutcome> {
        self.resolve(claimer, target, origin, true)
    }

    fn resolve(
        &self,
        claimer: &Document,
        target: BareNumber,
        origin: TargetOrigin,
        fallback_allowed: bool,
    ) -> NumberingResult<SwapOutcome> {
        let scope = claimer.scope();
        let documents = self.store.scan_scope(&scope)?;
        // A bare holder outranks a placeholder holder: if both exist the
        // slot is genuinely taken and no swap can free it.
        let matches: Vec<_> = documents
            .iter()
            .filter(|doc| doc.id != claimer.id && holds_target(doc, target))
            .collect();
        let holder = matches
            .iter()
            .find(|doc| doc.number.is_bare())
            .or_else(|| matches.first())
            .copied();

        let Some(holder) = holder else {
            // Free slot: one conflict-checked write.
            if self
                .store
                .write_number(&claimer.id, DocumentNumber::Bare(target))?
                .is_conflict()
            {
                return Ok(SwapOutcome::Contended);
            }
            return Ok(SwapOutcome::Assigned(target));
        };

        if holder.status == DocumentStatus::Draft {
            if holder.number.is_draft_tagged() {
                return self.swap(claimer, holder, target);
            }
            // A bare-shaped number on a draft is another allocation in
            // flight (a foreign process between its swap and its commit).
            debug!(scope = %scope, target = %target, "target held by in-flight allocation");
            return Ok(SwapOutcome::Contended);
        }

        // Official holder. For a manual target that is the caller's
        // mistake; for a scanner target it is a data anomaly the scan
        // should have accounted for, worth one fresh candidate.
        match origin {
            TargetOrigin::Manual => Err(NumberingError::DuplicateNumber {
                number: target.to_string(),
            }),
            TargetOrigin::Scanner if fallback_allowed => {
                warn!(
                    scope = %scope,
                    target = %target,
                    holder = %holder.id,
                    "scanner candidate already held by an official document"
                );
                let fresh = self.scanner.next_official_number(&scope)?;
                self.resolve(claimer, fresh, TargetOrigin::Scanner, false)
            }
            TargetOrigin::Scanner => Ok(SwapOutcome::Contended),
        }
    }

    /// The three-phase rename
    fn swap(
        &self,
        claimer: &Document,
        holder: &Document,
        target: BareNumber,
    ) -> NumberingResult<SwapOutcome> {
        let scope = claimer.scope();
        debug!(
            scope = %scope,
            target = %target,
            holder = %holder.id,
            claimer = %claimer.id,
            "swapping bare number away from draft holder"
        );

        // Phase 1: holder vacates its placeholder.
        let holder_temp = DocumentNumber::Temporary {
            base: target,
            token: temp_token(),
        };
        if self.store.write_number(&holder.id, holder_temp)?.is_conflict() {
            return Ok(SwapOutcome::Contended);
        }

        // Phase 2: claimer parks on a temporary, then takes the slot.
        let claimer_temp = DocumentNumber::Temporary {
            base: target,
            token: temp_token(),
        };
        if self
            .store
            .write_number(&claimer.id, claimer_temp)?
            .is_conflict()
        {
            self.restore_holder(holder, target)?;
            return Ok(SwapOutcome::Contended);
        }
        if self
            .store
            .write_number(&claimer.id, DocumentNumber::Bare(target))?
            .is_conflict()
        {
            warn!(scope = %scope, target = %target, "bare slot taken between detection and claim");
            self.restore_holder(holder, target)?;
            return Ok(SwapOutcome::Contended);
        }

        // Phase 3: holder returns as a placeholder.
        self.restore_holder(holder, target)?;
        Ok(SwapOutcome::Assigned(target))
    }

    /// Put the holder back on a placeholder based on the swapped number
    fn restore_holder(&self, holder: &Document, base: BareNumber) -> NumberingResult<()> {
        let placeholder = self.issuer.issue(&holder.scope(), Some(base))?;
        // Placeholders are never bare-shaped, so this cannot conflict.
        self.store.write_number(&holder.id, placeholder)?;
        Ok(())
    }
}

/// Whether `doc` currently holds `target`, either as a bare number or as
/// the base of a plain `-DRAFT` placeholder
fn holds_target(doc: &Document, target: BareNumber) -> bool {
    match &doc.number {
        DocumentNumber::Bare(n) => *n == target,
        DocumentNumber::DraftTagged {
            base,
            tag: DraftTag::Draft,
        } => *base == target,
        // Stamp-tagged placeholders are already disambiguated and
        // temporaries belong to an interrupted swap; neither reserves
        // the slot.
        _ => false,
    }
}

/// Opaque disambiguator for temporary numbers
fn temp_token() -> String {
    format!("{:08x}", rand::thread_rng().gen::<u32>())
}
