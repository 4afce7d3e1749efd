//! File revision history data model

/// One revision from a file's history (`p4 filelog`)
///
/// The action here is an open set (history can contain branch and
/// integrate entries that never appear as pending actions), so it stays
/// a raw string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionRecord {
    /// Revision sequence number (`#n`)
    pub revision: u32,

    /// Action that produced this revision
    pub action: String,

    /// Timestamp as reported by the server
    pub date: String,

    /// User who submitted the revision
    pub user: String,

    /// Workspace the revision was submitted from
    pub workspace: String,

    /// Changelist description
    pub description: String,
}
