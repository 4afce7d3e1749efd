//! File history browsing, revision preview, and rollback

use color_eyre::eyre::eyre;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use crate::p4::{PerforceClient, Session};
use crate::workflow;

pub fn run(
    session: &Session,
    path: &str,
    rollback: Option<u32>,
    preview: Option<u32>,
) -> color_eyre::Result<()> {
    let revisions = session.file_history(path)?;

    if let Some(revision) = preview {
        return run_preview(session, path, revision);
    }
    if let Some(target) = rollback {
        return run_rollback(session, path, target, &revisions);
    }

    println!(
        "{:<5} {:<10} {:<12} {:<12} {:<16} {}",
        "Rev", "Action", "Date", "User", "Workspace", "Description"
    );
    for revision in &revisions {
        println!(
            "#{:<4} {:<10} {:<12} {:<12} {:<16} {}",
            revision.revision,
            revision.action,
            revision.date,
            revision.user,
            revision.workspace,
            revision.description.lines().next().unwrap_or_default()
        );
    }
    Ok(())
}

/// Retrieve one revision into the temp directory for inspection
fn run_preview(session: &Session, path: &str, revision: u32) -> color_eyre::Result<()> {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let destination = std::env::temp_dir().join(format!("{file_name}#{revision}"));

    session.retrieve_revision(path, revision, &destination)?;
    println!("Revision #{revision} written to {}", destination.display());
    Ok(())
}

/// Roll the file back to an earlier revision and submit
fn run_rollback(
    session: &Session,
    path: &str,
    target: u32,
    revisions: &[crate::model::RevisionRecord],
) -> color_eyre::Result<()> {
    // History is newest first; the head revision is the current one
    let current = revisions
        .first()
        .map(|r| r.revision)
        .ok_or_else(|| eyre!("{path} has no revision history"))?;

    if target >= current {
        return Err(eyre!(
            "target revision #{target} is not older than the head revision #{current}"
        ));
    }

    let stat = session.file_stat(path)?;
    if stat.action.is_some() {
        return Err(eyre!("{path} is currently checked out; revert it first"));
    }

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Rollback #{current} to #{target}?"))
        .default(false)
        .interact()?;
    if !confirmed {
        return Ok(());
    }

    let outcome = workflow::rollback_to_revision(session, path, target, current)?;
    println!(
        "Successful rollback; submitted {} as revision #{}.",
        outcome.submitted.join(", "),
        current + 1
    );
    Ok(())
}
