//! File-level commands: opened listing, checkout, delete, revert, sync

use std::path::Path;

use color_eyre::eyre::eyre;
use tracing::{info, warn};

use crate::p4::constants::CLIENT_WILDCARD;
use crate::p4::{P4Error, PerforceClient, Session};

/// List opened files; optionally remove one from the changelist first
pub fn run_opened(session: &Session, revert: Option<&str>) -> color_eyre::Result<()> {
    if let Some(path) = revert {
        let output = session.revert_files(&[path.to_string()], true)?;
        info!(%path, "removed from changelist");
        print!("{output}");
    }

    let opened = session.opened_files()?;
    if opened.is_empty() {
        println!("No files opened in workspace {}.", session.workspace());
        return Ok(());
    }

    println!(
        "{:<2} {:<40} {:<10} {:<8} {:<12} {}",
        "", "File", "Type", "Action", "User", "Folder"
    );
    for file in &opened {
        let lock_marker = if file.locked { "*" } else { "" };
        println!(
            "{:<2} {:<40} {:<10} {:<8} {:<12} {}",
            lock_marker,
            file.file_name(),
            file.file_type,
            file.action.label(),
            file.user,
            file.folder()
        );
    }
    Ok(())
}

/// Check out files for edit, or add them if the depot doesn't know them
/// yet; either way, take the lock
pub fn run_checkout(session: &Session, paths: &[String]) -> color_eyre::Result<()> {
    let paths = in_client_root(session, paths)?;

    for path in &paths {
        // fstat succeeds only for files the depot already tracks
        match session.file_stat(path) {
            Ok(_) => {
                session.open_for_edit(path)?;
                info!(%path, "opened for edit");
            }
            Err(P4Error::CommandFailed { .. }) => {
                print!("{}", session.add_files(std::slice::from_ref(path))?);
                info!(%path, "opened for add");
            }
            Err(e) => return Err(e.into()),
        }
        session.lock_files(std::slice::from_ref(path))?;
    }

    println!("Checked out {} file(s).", paths.len());
    Ok(())
}

/// Mark files for delete
pub fn run_delete(session: &Session, paths: &[String]) -> color_eyre::Result<()> {
    let paths = in_client_root(session, paths)?;
    let output = session.delete_files(&paths)?;
    print!("{output}");
    Ok(())
}

/// Revert opened files
pub fn run_revert(session: &Session, paths: &[String], keep_local: bool) -> color_eyre::Result<()> {
    let paths = in_client_root(session, paths)?;
    let output = session.revert_files(&paths, keep_local)?;
    print!("{output}");
    Ok(())
}

/// Sync one path, or the whole client when no path is given
pub fn run_sync(session: &Session, path: Option<&str>, force: bool) -> color_eyre::Result<()> {
    let target = path.unwrap_or(CLIENT_WILDCARD);
    session.sync(target, force)?;
    if path.is_some() {
        println!("Synced {target} to latest revision.");
    } else {
        println!("Synced client {} to latest revisions.", session.workspace());
    }
    Ok(())
}

/// Keep only paths inside the client root, warning about the rest;
/// error out when nothing remains
fn in_client_root(session: &Session, paths: &[String]) -> color_eyre::Result<Vec<String>> {
    let mut valid = Vec::new();
    for path in paths {
        if session.is_path_in_client_root(Path::new(path)) {
            valid.push(path.clone());
        } else {
            warn!(%path, "not in client root, skipping");
        }
    }
    if valid.is_empty() {
        return Err(eyre!("no paths inside the client root {}", session.root().display()));
    }
    Ok(valid)
}
