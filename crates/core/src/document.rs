//! Document record
//!
//! The slice of a document this engine owns: identity, scope, prefix,
//! number and status. Line items, client data and totals live with the
//! document-content collaborator and never enter the numbering paths.

use crate::number::DocumentNumber;
use crate::status::DocumentStatus;
use crate::types::{DocumentId, DocumentKind, ScopeKey, UserId, WorkspaceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numbering-relevant state of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Immutable identity
    pub id: DocumentId,
    /// Workspace the document belongs to, immutable after creation
    pub workspace_id: WorkspaceId,
    /// Document kind, immutable
    pub kind: DocumentKind,
    /// Display/filtering label (year-month bucket by default)
    ///
    /// Prefixes do NOT partition the sequence: two documents with different
    /// prefixes still draw from one sequence per scope.
    pub prefix: String,
    /// Current number in one of the three shapes
    pub number: DocumentNumber,
    /// Lifecycle status, governs the number shape
    pub status: DocumentStatus,
    /// Owning user
    pub created_by: UserId,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Create a new draft document holding a placeholder number
    pub fn new_draft(
        workspace_id: WorkspaceId,
        kind: DocumentKind,
        prefix: String,
        number: DocumentNumber,
        created_by: UserId,
    ) -> Self {
        Self {
            id: DocumentId::new(),
            workspace_id,
            kind,
            prefix,
            number,
            status: DocumentStatus::Draft,
            created_by,
            created_at: Utc::now(),
        }
    }

    /// The scope this document's numbering lives in
    pub fn scope(&self) -> ScopeKey {
        ScopeKey::new(self.workspace_id, self.kind)
    }

    /// The bare number this document officially holds, if any
    ///
    /// Returns None for drafts and for documents stuck mid-swap: only an
    /// official document with a bare-shaped number consumes the sequence.
    pub fn official_number(&self) -> Option<crate::number::BareNumber> {
        match (&self.number, self.status.is_official()) {
            (DocumentNumber::Bare(n), true) => Some(*n),
            _ => None,
        }
    }
}
