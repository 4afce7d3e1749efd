//! File status data model

use super::PendingAction;

/// Result of a `p4 fstat` query for a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    /// Depot path
    pub depot_path: String,

    /// Local path inside the client workspace
    pub client_path: String,

    /// Latest revision on the server, if the file exists in the depot
    pub head_revision: Option<u32>,

    /// Revision currently synced to the workspace
    pub have_revision: Option<u32>,

    /// Perforce file type
    pub file_type: String,

    /// Pending action, if the file is currently opened
    pub action: Option<PendingAction>,
}

impl FileStat {
    /// Whether the workspace is synced to the latest server revision
    pub fn is_up_to_date(&self) -> bool {
        match (self.have_revision, self.head_revision) {
            (Some(have), Some(head)) => have == head,
            _ => false,
        }
    }
}
