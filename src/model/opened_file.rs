//! Opened file data model

use std::fmt;

/// A file the server reports as checked out in some workspace
///
/// Materialized fresh from a `p4 opened` query at the start of each
/// workflow pass; never cached across invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedFile {
    /// Depot path (`//depot/...`), the unique key for reconciliation
    pub depot_path: String,

    /// Local path inside the client workspace
    pub client_path: String,

    /// Perforce file type (text, binary, symlink variants)
    pub file_type: String,

    /// Action the server will apply on submit
    pub action: PendingAction,

    /// User who opened the file
    pub user: String,

    /// Workspace the file is opened in
    pub workspace: String,

    /// Whether our workspace holds the lock on this file
    pub locked: bool,
}

impl OpenedFile {
    /// File name component of the client path
    pub fn file_name(&self) -> &str {
        self.client_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.client_path)
    }

    /// Directory component of the client path
    pub fn folder(&self) -> &str {
        self.client_path
            .rfind(['/', '\\'])
            .map_or("", |idx| &self.client_path[..idx])
    }
}

/// The pending action attached to an opened file
///
/// Closed set: the submit workflow only ever deals with files opened
/// for add, edit, or delete. Anything else in server output is a parse
/// error rather than a silently mislabeled entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    /// File will be added to the depot
    Add,

    /// File is opened for edit
    Edit,

    /// File will be deleted from the depot
    Delete,
}

impl PendingAction {
    /// Parse the server's action string
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "add" => Some(PendingAction::Add),
            "edit" => Some(PendingAction::Edit),
            "delete" => Some(PendingAction::Delete),
            _ => None,
        }
    }

    /// Human-readable label for listings
    pub fn label(&self) -> &'static str {
        match self {
            PendingAction::Add => "Add",
            PendingAction::Edit => "Edit",
            PendingAction::Delete => "Delete",
        }
    }

    /// Single-character indicator for compact listings
    pub fn indicator(&self) -> char {
        match self {
            PendingAction::Add => 'A',
            PendingAction::Edit => 'E',
            PendingAction::Delete => 'D',
        }
    }
}

impl fmt::Display for PendingAction {
    /// The server's wire spelling of the action
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            PendingAction::Add => "add",
            PendingAction::Edit => "edit",
            PendingAction::Delete => "delete",
        };
        write!(f, "{value}")
    }
}
