//! Per-scope advisory locks
//!
//! Serializes allocations and swaps within one (workspace, kind) scope in
//! a single process. The conflict-checked store write remains the invariant
//! of record; the lock exists so the three-phase swap executes as one unit
//! and so concurrent allocations in a hot scope don't burn their retry
//! budget against each other.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use gapless_core::ScopeKey;

/// Registry of per-scope mutexes
///
/// Entries are created on first use and never removed: the set of scopes is
/// bounded by workspaces times document kinds, and an idle mutex is two
/// words.
#[derive(Debug, Default)]
pub struct ScopeLocks {
    locks: DashMap<ScopeKey, Arc<Mutex<()>>>,
}

impl ScopeLocks {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the scope's lock
    pub fn with_scope<R>(&self, scope: &ScopeKey, f: impl FnOnce() -> R) -> R {
        let mutex = self
            .locks
            .entry(*scope)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = mutex.lock();
        f()
    }
}
