//! Core identifier types for the numbering engine
//!
//! This module defines the foundational identifiers:
//! - DocumentId: Unique identifier for a document
//! - WorkspaceId: Tenant boundary for uniqueness and sequencing
//! - UserId: Owning user of a document
//! - DocumentKind: Discriminates quotes, invoices and credit notes
//! - ScopeKey: The (workspace, kind) pair numbering is defined within

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a document
///
/// A DocumentId is a wrapper around a UUID v4. It is assigned once at
/// creation and never changes, regardless of how often the document's
/// number or status is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Create a new random DocumentId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a DocumentId from a string representation
    ///
    /// Accepts standard UUID format (with or without hyphens).
    /// Returns None if the string is not a valid UUID.
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }

    /// Get the raw bytes of this DocumentId
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the workspace a document belongs to
///
/// Workspaces are the tenant boundary: bare numbers are unique and
/// sequential within one workspace and one document kind, never across
/// workspaces. Immutable after document creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceId(Uuid);

impl WorkspaceId {
    /// Create a new random WorkspaceId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a WorkspaceId from a string representation
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for WorkspaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the user who created a document
///
/// Carried on the record for ownership and auditing. Sequencing is
/// workspace-scoped and never consults this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Create a new random UserId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a UserId from a string representation
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of business document
///
/// Each kind carries its own sequence per workspace. The transition table
/// and numbering rules are identical across kinds; the kind only selects
/// which sequence a document draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentKind {
    /// Sales quote
    Quote,
    /// Invoice
    Invoice,
    /// Credit note amending an invoice
    CreditNote,
}

impl DocumentKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Quote => "quote",
            DocumentKind::Invoice => "invoice",
            DocumentKind::CreditNote => "credit_note",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The scope numbering uniqueness and sequencing are defined within
///
/// A ScopeKey pairs a workspace with a document kind. Two documents in the
/// same scope may never hold the same bare number while official; documents
/// in different scopes never interact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeKey {
    /// Workspace the scope belongs to
    pub workspace_id: WorkspaceId,
    /// Document kind within the workspace
    pub kind: DocumentKind,
}

impl ScopeKey {
    /// Create a new scope key
    pub fn new(workspace_id: WorkspaceId, kind: DocumentKind) -> Self {
        Self { workspace_id, kind }
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.workspace_id, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_new_is_unique() {
        let a = DocumentId::new();
        let b = DocumentId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn document_id_roundtrips_through_string() {
        let id = DocumentId::new();
        let parsed = DocumentId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn document_id_rejects_garbage() {
        assert!(DocumentId::from_string("not-a-uuid").is_none());
    }

    #[test]
    fn kind_display_is_stable() {
        assert_eq!(DocumentKind::Quote.to_string(), "quote");
        assert_eq!(DocumentKind::Invoice.to_string(), "invoice");
        assert_eq!(DocumentKind::CreditNote.to_string(), "credit_note");
    }

    #[test]
    fn scope_key_equality_requires_both_parts() {
        let ws = WorkspaceId::new();
        let a = ScopeKey::new(ws, DocumentKind::Invoice);
        let b = ScopeKey::new(ws, DocumentKind::Quote);
        let c = ScopeKey::new(WorkspaceId::new(), DocumentKind::Invoice);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, ScopeKey::new(ws, DocumentKind::Invoice));
    }

    #[test]
    fn ids_serialize_as_uuid_strings() {
        let id = DocumentId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert!(json.contains(&id.to_string()));
    }
}
