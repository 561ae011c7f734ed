//! Public API surface of the gapless numbering engine
//!
//! Document-creation and update resolvers talk to [`NumberingFacade`] and
//! nothing else; the engine, scanner and swapper underneath are wired up
//! by the facade constructors.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod facade;
mod request;

pub use facade::NumberingFacade;
pub use request::{Allocation, AllocationRequest, TransitionOutcome};

// Re-export what callers need to build requests and handle results.
pub use gapless_core::{
    BareNumber, ConversionTracker, Document, DocumentId, DocumentKind, DocumentNumber,
    DocumentStatus, DocumentStore, NoConversions, NumberingError, NumberingResult, ScopeKey,
    UserId, WorkspaceId,
};
pub use gapless_engine::{EngineConfig, RepairReport};
