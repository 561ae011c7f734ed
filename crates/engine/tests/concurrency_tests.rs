//! Concurrent/multi-threaded tests for gapless-engine
//!
//! These tests verify the allocation invariant under actual concurrent
//! execution:
//!
//! 1. **Uniqueness** - N racing transitions produce N distinct bare numbers
//! 2. **Gaplessness** - the numbers are exactly 1..=N, no holes
//! 3. **Draft non-consumption** - racing draft creation moves no sequence
//! 4. **Swap under contention** - a colliding draft is renamed exactly once
//!
//! ## Running These Tests
//!
//! ```bash
//! cargo test --test concurrency_tests
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use proptest::prelude::*;

use gapless_core::{
    BareNumber, Document, DocumentKind, DocumentNumber, DocumentStatus, DocumentStore, ScopeKey,
    UserId, WorkspaceId,
};
use gapless_engine::NumberingEngine;
use gapless_storage::MemoryStore;

// ============================================================================
// Test Helpers
// ============================================================================

fn create_env() -> (Arc<MemoryStore>, Arc<NumberingEngine>, ScopeKey) {
    let store = Arc::new(MemoryStore::new());
    let engine = Arc::new(NumberingEngine::with_defaults(store.clone()));
    let scope = ScopeKey::new(WorkspaceId::new(), DocumentKind::Invoice);
    (store, engine, scope)
}

fn persist_draft(store: &MemoryStore, engine: &NumberingEngine, scope: &ScopeKey) -> Document {
    let number = engine.issue_draft_number(scope, None).unwrap();
    let doc = Document::new_draft(
        scope.workspace_id,
        scope.kind,
        "2026-08".to_string(),
        number,
        UserId::new(),
    );
    store.insert(doc.clone()).unwrap();
    doc
}

/// Race `n` draft documents through DRAFT -> PENDING and return the bare
/// numbers they were assigned.
fn race_transitions(n: usize) -> Vec<BareNumber> {
    let (store, engine, scope) = create_env();
    let drafts: Vec<_> = (0..n)
        .map(|_| persist_draft(&store, &engine, &scope))
        .collect();

    let barrier = Arc::new(Barrier::new(n));
    let handles: Vec<_> = drafts
        .into_iter()
        .map(|doc| {
            let engine = engine.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                engine
                    .transition(&doc.id, DocumentStatus::Draft, DocumentStatus::Pending)
                    .unwrap()
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|h| {
            let record = h.join().unwrap();
            match record.number {
                DocumentNumber::Bare(n) => n,
                other => panic!("transition returned non-bare number {}", other),
            }
        })
        .collect()
}

// ============================================================================
// SECTION 1: Uniqueness and gaplessness under racing transitions
// ============================================================================

#[test]
fn racing_transitions_get_distinct_numbers() {
    let numbers = race_transitions(16);
    let distinct: HashSet<_> = numbers.iter().collect();
    assert_eq!(distinct.len(), 16);
}

#[test]
fn racing_transitions_fill_exactly_one_to_n() {
    let numbers = race_transitions(24);
    let mut values: Vec<u32> = numbers.iter().map(|n| n.value()).collect();
    values.sort_unstable();
    let expected: Vec<u32> = (1..=24).collect();
    assert_eq!(values, expected);
}

#[test]
fn racing_transitions_leave_no_temporaries() {
    let (store, engine, scope) = create_env();
    let drafts: Vec<_> = (0..12)
        .map(|_| persist_draft(&store, &engine, &scope))
        .collect();

    let barrier = Arc::new(Barrier::new(drafts.len()));
    let handles: Vec<_> = drafts
        .into_iter()
        .map(|doc| {
            let engine = engine.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                engine
                    .transition(&doc.id, DocumentStatus::Draft, DocumentStatus::Pending)
                    .unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert!(store.scan_temporary().unwrap().is_empty());
    assert!(engine.repair().unwrap().is_clean());
}

// ============================================================================
// SECTION 2: Drafts never consume the sequence
// ============================================================================

#[test]
fn racing_draft_creation_moves_no_sequence() {
    let (store, engine, scope) = create_env();

    let barrier = Arc::new(Barrier::new(10));
    let handles: Vec<_> = (0..10)
        .map(|_| {
            let store = store.clone();
            let engine = engine.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                persist_draft(&store, &engine, &scope);
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(store.len(), 10);
    assert_eq!(engine.next_official_number(&scope).unwrap().value(), 1);
}

// ============================================================================
// SECTION 3: Swap under contention
// ============================================================================

#[test]
fn racing_claims_against_a_draft_holder_stay_unique() {
    let (store, engine, scope) = create_env();
    // One draft informally holding 1, four claimers all targeting it.
    let holder = persist_draft(&store, &engine, &scope);
    assert_eq!(holder.number.to_string(), "000001-DRAFT");
    let claimers: Vec<_> = (0..4)
        .map(|_| persist_draft(&store, &engine, &scope))
        .collect();

    let barrier = Arc::new(Barrier::new(claimers.len()));
    let handles: Vec<_> = claimers
        .iter()
        .map(|doc| {
            let engine = engine.clone();
            let barrier = barrier.clone();
            let id = doc.id;
            thread::spawn(move || {
                barrier.wait();
                engine
                    .transition_with_number(
                        &id,
                        DocumentStatus::Draft,
                        DocumentStatus::Pending,
                        Some(BareNumber::new(1).unwrap()),
                    )
                    .ok()
            })
        })
        .collect();

    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    // Exactly one claimer wins bare 1; the others see a duplicate error
    // because by then an official document holds it.
    let winners = outcomes.iter().flatten().count();
    assert_eq!(winners, 1);

    let holder = store.get(&holder.id).unwrap().unwrap();
    assert_eq!(holder.status, DocumentStatus::Draft);
    assert!(holder.number.is_draft_tagged());
    assert!(store.scan_temporary().unwrap().is_empty());
}

// ============================================================================
// SECTION 4: Property: uniqueness over randomized interleavings
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn n_racing_transitions_yield_n_distinct_numbers(n in 2usize..=50) {
        let numbers = race_transitions(n);
        let distinct: HashSet<_> = numbers.iter().collect();
        prop_assert_eq!(distinct.len(), n);

        let mut values: Vec<u32> = numbers.iter().map(|x| x.value()).collect();
        values.sort_unstable();
        prop_assert_eq!(values, (1..=n as u32).collect::<Vec<_>>());
    }
}
