//! Interactive submit flow
//!
//! The command-line counterpart of a submit dialog: pick files from the
//! live changelist (all checked by default), enter a description with
//! live validation, choose whether to keep the files checked out.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect};

use crate::p4::{PerforceClient, Session};
use crate::workflow::{self, WorkflowError};

pub fn run(session: &Session) -> color_eyre::Result<()> {
    let opened = session.opened_files()?;
    if opened.is_empty() {
        println!("No files opened in workspace {}.", session.workspace());
        return Ok(());
    }

    let theme = ColorfulTheme::default();

    let items: Vec<String> = opened
        .iter()
        .map(|file| {
            format!(
                "{} {}  [{} {}]",
                file.action.indicator(),
                file.client_path,
                file.action.label(),
                file.file_type,
            )
        })
        .collect();
    let defaults = vec![true; items.len()];

    let picked = MultiSelect::with_theme(&theme)
        .with_prompt("Files to submit")
        .items(&items)
        .defaults(&defaults)
        .interact()?;
    if picked.is_empty() {
        println!("Nothing selected.");
        return Ok(());
    }

    let description: String = Input::with_theme(&theme)
        .with_prompt("Change description")
        .validate_with(|input: &String| -> Result<(), &str> {
            if workflow::validate_description(input) {
                Ok(())
            } else {
                Err("description must be non-empty and free of '<' and '>'")
            }
        })
        .interact_text()?;

    let keep_checked_out = Confirm::with_theme(&theme)
        .with_prompt("Keep files checked out?")
        .default(false)
        .interact()?;

    let requested: Vec<String> = picked
        .iter()
        .map(|&index| opened[index].depot_path.clone())
        .collect();

    match workflow::submit(session, &requested, &description, keep_checked_out) {
        Ok(outcome) => {
            println!("Submitted {} file(s):", outcome.submitted.len());
            for path in &outcome.submitted {
                println!("  {path}");
            }
            if !outcome.stale.is_empty() {
                println!(
                    "Dropped {} stale selection(s) no longer in the changelist.",
                    outcome.stale.len()
                );
            }
            if !outcome.repair_failures.is_empty() {
                println!(
                    "Warning: {} file(s) may still be read-only locally.",
                    outcome.repair_failures.len()
                );
            }
            Ok(())
        }
        Err(WorkflowError::Client(e)) if e.is_warning() => {
            // Warning-severity rejections (nothing to resubmit, files
            // up to date) are reported without a failure exit
            println!("Submit warning: {e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
