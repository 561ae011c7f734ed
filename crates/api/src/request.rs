//! Facade request and response types

use gapless_core::{
    DocumentId, DocumentKind, DocumentNumber, DocumentStatus, ScopeKey, WorkspaceId,
};
use serde::{Deserialize, Serialize};

/// One allocation request as it arrives from a creation/update resolver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Workspace the document belongs to
    pub workspace_id: WorkspaceId,
    /// Document kind
    pub kind: DocumentKind,
    /// Display prefix; defaults to the current year-month bucket
    pub prefix: Option<String>,
    /// Caller-supplied number, 1-6 digits, as typed by the user
    pub manual_number: Option<String>,
    /// Status the document is currently in
    pub current_status: DocumentStatus,
    /// Status the request wants to reach
    pub target_status: DocumentStatus,
    /// The document being (re)numbered; required for official targets,
    /// absent when previewing a placeholder for a document not yet created
    pub document_id: Option<DocumentId>,
}

impl AllocationRequest {
    /// The scope this request allocates within
    pub fn scope(&self) -> ScopeKey {
        ScopeKey::new(self.workspace_id, self.kind)
    }
}

/// The number/prefix pair handed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// The allocated number (bare or placeholder, never temporary)
    pub number: DocumentNumber,
    /// The prefix the document should display under
    pub prefix: String,
}

/// Result of a status transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    /// The number the document holds after the transition
    pub number: DocumentNumber,
    /// The status the document reached
    pub status: DocumentStatus,
}
