//! Gapless - document numbering and status-transition engine
//!
//! Gapless allocates legally-unique sequence numbers for business
//! documents (quotes, invoices, credit notes) per workspace, keeps drafts
//! from consuming the sequence, and enforces the status state machine that
//! decides when a document is (re)numbered.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use gapless::{
//!     AllocationRequest, Document, DocumentKind, DocumentStatus, DocumentStore, MemoryStore,
//!     NumberingFacade, UserId, WorkspaceId,
//! };
//!
//! # fn main() -> gapless::NumberingResult<()> {
//! let store = Arc::new(MemoryStore::new());
//! let facade = NumberingFacade::with_defaults(store.clone());
//! let workspace = WorkspaceId::new();
//!
//! // A draft gets a placeholder that consumes nothing.
//! let draft = facade.allocate(AllocationRequest {
//!     workspace_id: workspace,
//!     kind: DocumentKind::Invoice,
//!     prefix: None,
//!     manual_number: None,
//!     current_status: DocumentStatus::Draft,
//!     target_status: DocumentStatus::Draft,
//!     document_id: None,
//! })?;
//! assert_eq!(draft.number.to_string(), "000001-DRAFT");
//!
//! // Persist the document, then finalize it to claim an official number.
//! let doc = Document::new_draft(
//!     workspace,
//!     DocumentKind::Invoice,
//!     draft.prefix.clone(),
//!     draft.number.clone(),
//!     UserId::new(),
//! );
//! store.insert(doc.clone())?;
//! let allocation = facade.allocate(AllocationRequest {
//!     workspace_id: workspace,
//!     kind: DocumentKind::Invoice,
//!     prefix: Some(draft.prefix),
//!     manual_number: None,
//!     current_status: DocumentStatus::Draft,
//!     target_status: DocumentStatus::Pending,
//!     document_id: Some(doc.id),
//! })?;
//! assert_eq!(allocation.number.to_string(), "000001");
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! All operations go through [`NumberingFacade`]. Persistence is a
//! collaborator behind the [`DocumentStore`] trait; [`MemoryStore`] is the
//! in-process implementation. Internal components (scanner, swapper,
//! state machine) are reachable through `gapless_engine` when a deployment
//! needs to wire them differently.

pub use gapless_api::*;
pub use gapless_storage::MemoryStore;
