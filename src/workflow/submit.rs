//! Changelist reconciliation and submission

use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::WorkflowError;
use crate::p4::PerforceClient;

/// Sentinel text shown in an unedited description field
pub const DESCRIPTION_PLACEHOLDER: &str = "<Enter Description>";

/// Validate a changelist description
///
/// Invalid when empty, equal to the unedited placeholder, or containing
/// `<` or `>` (reserved as template-field markers). Pure and cheap, so
/// the front-end can re-run it on every keystroke.
pub fn validate_description(text: &str) -> bool {
    !text.trim().is_empty()
        && text != DESCRIPTION_PLACEHOLDER
        && !text.contains('<')
        && !text.contains('>')
}

/// What a submission actually did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Depot paths submitted, in server changelist order
    pub submitted: Vec<String>,

    /// Opened files the user left unchecked; warned, not submitted
    pub skipped: Vec<String>,

    /// Requested paths no longer open on the server; dropped
    pub stale: Vec<String>,

    /// Files whose post-submit read-only repair failed (non-fatal)
    pub repair_failures: Vec<String>,
}

/// Reconcile a user-confirmed file subset against the live pending
/// changelist and submit it
///
/// `requested` holds depot paths the user confirmed for inclusion. The
/// submitted set is exactly the intersection of `requested` with the
/// server's live opened-file list, in server order. With
/// `keep_checked_out` the files are reopened for edit after the submit;
/// otherwise the local read-only bits are cleared afterward, since
/// submit without reopen leaves workspace files read-only on some hosts.
pub fn submit(
    client: &dyn PerforceClient,
    requested: &[String],
    description: &str,
    keep_checked_out: bool,
) -> Result<SubmitOutcome, WorkflowError> {
    if !validate_description(description) {
        return Err(WorkflowError::InvalidDescription);
    }

    // The caller's selection was made against a snapshot that may be
    // outdated by now; re-fetch the authoritative list before building
    // the change.
    let opened = client.opened_files()?;
    info!(files = ?requested, "files passed for submission");

    let mut submitted = Vec::new();
    let mut skipped = Vec::new();
    for file in &opened {
        if requested.iter().any(|path| path == &file.depot_path) {
            submitted.push(file.depot_path.clone());
        } else {
            warn!(
                file = %file.depot_path,
                action = %file.action,
                "file not in changelist"
            );
            skipped.push(file.depot_path.clone());
        }
    }

    let stale: Vec<String> = requested
        .iter()
        .filter(|path| !opened.iter().any(|file| &file.depot_path == *path))
        .cloned()
        .collect();
    if !stale.is_empty() {
        debug!(files = ?stale, "requested files no longer opened, dropping");
    }

    if submitted.is_empty() {
        return Err(WorkflowError::NothingToSubmit);
    }

    let mut spec = client.fetch_pending_change()?;
    spec.description = description.to_string();
    spec.files = submitted.clone();
    info!(files = ?spec.files, "final changelist files");

    client.submit_change(&spec, keep_checked_out)?;

    let mut repair_failures = Vec::new();
    if !keep_checked_out {
        for path in &submitted {
            let repaired = client.file_stat(path).and_then(|stat| {
                client.set_read_only(&[PathBuf::from(stat.client_path)], false)
            });
            if let Err(e) = repaired {
                warn!(file = %path, error = %e, "could not clear read-only bit after submit");
                repair_failures.push(path.clone());
            }
        }
    }

    Ok(SubmitOutcome {
        submitted,
        skipped,
        stale,
        repair_failures,
    })
}
