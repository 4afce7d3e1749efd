//! Forced pending-changelist deletion

use tracing::{error, info, warn};

use crate::model::PendingChangelist;
use crate::p4::PerforceClient;

/// Result of a cleanup pass over pending changelists
#[derive(Debug, Clone, Default)]
pub struct CleanupReport {
    /// Changelists unlocked, reverted, and deleted
    pub deleted: Vec<u32>,

    /// Changelists left untouched due to ownership mismatches
    pub skipped: Vec<SkippedChangelist>,

    /// Changelists we own but could not delete
    pub failed: Vec<u32>,
}

/// A changelist skipped during cleanup, with the ownership dimensions
/// that failed (checked independently)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedChangelist {
    pub number: u32,
    pub user_mismatch: bool,
    pub workspace_mismatch: bool,
}

/// Force-delete pending changelists owned by the current user and
/// workspace
///
/// For each owned changelist: unlock it, revert all its files, then
/// delete it. Changelists owned by a different user or workspace are
/// skipped with a warning per mismatched dimension. Failures on one
/// changelist never stop the rest of the pass.
pub fn delete_pending_changelists(
    client: &dyn PerforceClient,
    lists: &[PendingChangelist],
) -> CleanupReport {
    let mut report = CleanupReport::default();

    for list in lists {
        let owns_user = list.user == client.user();
        let owns_workspace = list.workspace == client.workspace();

        if !owns_user {
            warn!(
                change = list.number,
                owner = %list.user,
                "changelist belongs to another user, can't delete"
            );
        }
        if !owns_workspace {
            warn!(
                change = list.number,
                workspace = %list.workspace,
                "changelist belongs to another workspace, can't delete"
            );
        }
        if !(owns_user && owns_workspace) {
            report.skipped.push(SkippedChangelist {
                number: list.number,
                user_mismatch: !owns_user,
                workspace_mismatch: !owns_workspace,
            });
            continue;
        }

        info!(change = list.number, workspace = %list.workspace, "deleting changelist");
        let result = client
            .unlock_changelist(list.number)
            .and_then(|()| client.revert_changelist(list.number))
            .and_then(|()| client.delete_changelist(list.number));

        match result {
            Ok(()) => report.deleted.push(list.number),
            Err(e) => {
                error!(change = list.number, error = %e, "failed to delete changelist");
                report.failed.push(list.number);
            }
        }
    }

    report
}
