//! Changelist data models

/// A mutable changelist form, as fetched with `p4 change -o`
///
/// The description and file list are overwritten by the submit workflow
/// before the form goes back to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSpec {
    /// Changelist number; `None` means the default pending changelist
    /// (form value `new`)
    pub number: Option<u32>,

    /// Owning user
    pub user: String,

    /// Owning client workspace
    pub workspace: String,

    /// Form status (`new` or `pending`)
    pub status: String,

    /// Free-text description
    pub description: String,

    /// Depot paths included in the changelist
    pub files: Vec<String>,
}

/// One entry from `p4 changes -s pending`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChangelist {
    /// Changelist number
    pub number: u32,

    /// Owning user
    pub user: String,

    /// Owning client workspace
    pub workspace: String,

    /// Changelist status as reported by the server
    pub status: String,

    /// Description (possibly truncated by the server)
    pub description: String,
}
