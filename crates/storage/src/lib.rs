//! Storage backends for the gapless numbering engine
//!
//! Provides the in-process `DocumentStore` implementation. Deployments that
//! persist documents elsewhere implement `gapless_core::DocumentStore`
//! against their own database; the engine only ever talks to the trait.

#![warn(clippy::all)]

mod memory;

pub use memory::MemoryStore;
