//! Command-line front-end
//!
//! Plays the role the submit/history dialogs play in a GUI client: it
//! collects a confirmed file subset, a description, and the
//! keep-checked-out flag, then hands off to the workflow layer.

mod files;
mod history;
mod submit;

use clap::{Parser, Subcommand};
use color_eyre::eyre::eyre;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Password};
use tracing::warn;

use crate::p4::{ConnectionSettings, P4Error, PerforceClient, Session};
use crate::workflow;

#[derive(Parser)]
#[command(name = "p4flow")]
#[command(about = "Perforce changelist workflows from the command line")]
#[command(version)]
pub struct Cli {
    /// Perforce server address
    #[arg(short = 'p', long, env = "P4PORT")]
    port: String,

    /// Perforce user name
    #[arg(short = 'u', long, env = "P4USER")]
    user: String,

    /// Client workspace name
    #[arg(short = 'c', long, env = "P4CLIENT")]
    client: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile and submit opened files interactively
    Submit,

    /// List files opened in this workspace
    Opened {
        /// Remove a file from the changelist, keeping local content
        #[arg(long, value_name = "PATH")]
        revert: Option<String>,
    },

    /// Check out files for edit (or add, if new), locking them
    Checkout {
        /// Files to check out
        paths: Vec<String>,
    },

    /// Mark files for delete
    Delete {
        /// Files to mark for delete
        paths: Vec<String>,
    },

    /// Revert opened files
    Revert {
        /// Files to revert
        paths: Vec<String>,

        /// Keep the local file content
        #[arg(short = 'k', long)]
        keep_local: bool,
    },

    /// Show a file's revision history
    History {
        /// File to inspect
        path: String,

        /// Roll the file back to this revision and submit
        #[arg(long, value_name = "REVISION")]
        rollback: Option<u32>,

        /// Retrieve this revision into the temp directory for preview
        #[arg(long, value_name = "REVISION")]
        preview: Option<u32>,
    },

    /// Sync a path (or the whole client) to latest
    Sync {
        /// Path to sync; the whole client when omitted
        path: Option<String>,

        /// Force re-sync even if up to date
        #[arg(short = 'f', long)]
        force: bool,
    },

    /// Unlock, revert, and delete owned pending changelists
    PurgePending {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Parse arguments, establish the session, and dispatch
pub fn run() -> color_eyre::Result<()> {
    let cli = Cli::parse();

    let settings = ConnectionSettings {
        port: cli.port,
        user: cli.user,
        client: cli.client,
    };
    let session = connect(&settings)?;

    match cli.command {
        Commands::Submit => submit::run(&session),
        Commands::Opened { revert } => files::run_opened(&session, revert.as_deref()),
        Commands::Checkout { paths } => files::run_checkout(&session, &paths),
        Commands::Delete { paths } => files::run_delete(&session, &paths),
        Commands::Revert { paths, keep_local } => files::run_revert(&session, &paths, keep_local),
        Commands::History {
            path,
            rollback,
            preview,
        } => history::run(&session, &path, rollback, preview),
        Commands::Sync { path, force } => files::run_sync(&session, path.as_deref(), force),
        Commands::PurgePending { yes } => run_purge_pending(&session, yes),
    }
}

/// Connect, prompting for a password only when no valid ticket exists
fn connect(settings: &ConnectionSettings) -> color_eyre::Result<Session> {
    match Session::connect(settings, None) {
        Ok(session) => Ok(session),
        Err(P4Error::LoginRequired) => {
            let password = Password::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("Password for {}", settings.user))
                .interact()?;
            Ok(Session::connect(settings, Some(&password))?)
        }
        Err(e) => Err(e.into()),
    }
}

fn run_purge_pending(session: &Session, yes: bool) -> color_eyre::Result<()> {
    let lists = session.pending_changelists()?;
    if lists.is_empty() {
        println!("No pending changelists.");
        return Ok(());
    }

    println!("Pending changelists:");
    for list in &lists {
        println!(
            "  {:>8}  {:<12} {:<16} {}",
            list.number,
            list.user,
            list.workspace,
            list.description.lines().next().unwrap_or_default()
        );
    }

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Unlock, revert, and delete every changelist you own?")
            .default(false)
            .interact()?;
        if !confirmed {
            return Ok(());
        }
    }

    let report = workflow::delete_pending_changelists(session, &lists);
    println!(
        "Deleted {} changelist(s), skipped {} (not owned), {} failed.",
        report.deleted.len(),
        report.skipped.len(),
        report.failed.len()
    );
    if !report.failed.is_empty() {
        warn!(changes = ?report.failed, "some changelists could not be deleted");
        return Err(eyre!("{} changelist(s) could not be deleted", report.failed.len()));
    }
    Ok(())
}
