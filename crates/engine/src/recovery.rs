//! Crash repair for interrupted swaps
//!
//! A temporary number is only legal while a swap is executing; one found at
//! rest means the process died mid-swap. Every temporary embeds the bare
//! number the swap was about, which is enough to resolve either direction:
//!
//! - a stuck **draft** (swap holder, or a claimer whose transition never
//!   committed) goes back to a placeholder based on that number;
//! - a stuck **official** document (committed status but a temporary
//!   number, which a conforming store cannot produce but a repair pass must
//!   not assume away) is driven forward to the bare slot, or to a fresh one
//!   if the slot has since been taken.
//!
//! Running the pass twice is a no-op: repaired documents no longer match
//! the temporary scan.

use std::sync::Arc;

use tracing::warn;

use gapless_core::{
    Document, DocumentNumber, DocumentStore, NumberingError, NumberingResult,
};

use crate::draft::DraftNumberIssuer;
use crate::locks::ScopeLocks;
use crate::scanner::SequenceScanner;

/// What a repair pass did
///
/// Returned so health checks can report repairs instead of hiding them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Documents found holding a temporary number
    pub stuck: usize,
    /// Drafts restored to a placeholder
    pub restored_placeholders: usize,
    /// Official documents driven forward to a bare number
    pub reassigned_official: usize,
}

impl RepairReport {
    /// Whether the store was already clean
    pub fn is_clean(&self) -> bool {
        self.stuck == 0
    }
}

/// Detects and repairs documents stuck mid-swap
pub struct RepairCoordinator {
    store: Arc<dyn DocumentStore>,
    locks: Arc<ScopeLocks>,
    scanner: SequenceScanner,
    issuer: DraftNumberIssuer,
}

impl RepairCoordinator {
    /// Create a coordinator over the given store
    pub fn new(store: Arc<dyn DocumentStore>, locks: Arc<ScopeLocks>) -> Self {
        Self {
            scanner: SequenceScanner::new(store.clone()),
            issuer: DraftNumberIssuer::new(store.clone()),
            store,
            locks,
        }
    }

    /// Repair every document stuck on a temporary number
    ///
    /// Intended for startup and health checks. Each repair is logged; a
    /// stuck document is never silently ignored.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered; the pass can simply be
    /// re-run, repairs already made stay made.
    pub fn repair(&self) -> NumberingResult<RepairReport> {
        let mut report = RepairReport::default();
        for stuck in self.store.scan_temporary()? {
            report.stuck += 1;
            let found = NumberingError::InconsistentState {
                document_id: stuck.id,
                number: stuck.number.to_string(),
            };
            warn!(error = %found, "repairing document stuck mid-swap");
            self.locks
                .with_scope(&stuck.scope(), || self.repair_one(&stuck, &mut report))?;
        }
        Ok(report)
    }

    fn repair_one(&self, stuck: &Document, report: &mut RepairReport) -> NumberingResult<()> {
        // Re-read under the lock; a concurrent request may have fixed it.
        let Some(document) = self.store.get(&stuck.id)? else {
            return Ok(());
        };
        let DocumentNumber::Temporary { base, .. } = document.number else {
            return Ok(());
        };
        let scope = document.scope();

        if document.status.is_official() {
            // Drive the interrupted claim forward.
            let target = if self.scanner.official_holder(&scope, base)?.is_none() {
                base
            } else {
                self.scanner.next_official_number(&scope)?
            };
            if self
                .store
                .write_number(&document.id, DocumentNumber::Bare(target))?
                .is_conflict()
            {
                // The slot moved under us; one fresh candidate settles it
                // because we hold the scope lock.
                let fresh = self.scanner.next_official_number(&scope)?;
                self.store
                    .write_number(&document.id, DocumentNumber::Bare(fresh))?;
            }
            report.reassigned_official += 1;
        } else {
            // Pre-swap state for a holder, and for a claimer too: both
            // were drafts before the swap started.
            let placeholder = self.issuer.issue(&scope, Some(base))?;
            self.store.write_number(&document.id, placeholder)?;
            report.restored_placeholders += 1;
        }
        Ok(())
    }
}
