//! Rollback-to-revision workflow

use std::path::Path;

use tracing::info;

use super::submit::{submit, SubmitOutcome};
use super::WorkflowError;
use crate::p4::PerforceClient;

/// Roll a file back to an earlier revision and submit the result
///
/// Retrieves the target revision's content over the live workspace
/// file and submits it as a new revision through the standard submit
/// contract, with a description of the form `Rollback #<current> to
/// #<target>`. `current_revision` is the file's head revision, the
/// latest entry in its history.
pub fn rollback_to_revision(
    client: &dyn PerforceClient,
    path: &str,
    target_revision: u32,
    current_revision: u32,
) -> Result<SubmitOutcome, WorkflowError> {
    let description = format!("Rollback #{current_revision} to #{target_revision}");

    let stat = client.file_stat(path)?;

    // Open for edit before overwriting; the workspace file stays
    // read-only until it is checked out.
    client.open_for_edit(path)?;
    client.retrieve_revision(path, target_revision, Path::new(&stat.client_path))?;
    info!(
        file = %stat.client_path,
        revision = target_revision,
        "retrieved revision into workspace"
    );

    submit(
        client,
        std::slice::from_ref(&stat.depot_path),
        &description,
        false,
    )
}
