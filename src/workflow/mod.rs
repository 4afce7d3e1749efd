//! Changelist workflows
//!
//! The reconciliation and submission rules: validating a description,
//! merging a user-confirmed file subset against the live server
//! changelist, submitting, and repairing local file state afterward.
//! Everything here talks to the server through the
//! [`PerforceClient`](crate::p4::PerforceClient) trait and holds no
//! state across invocations.

mod cleanup;
mod rollback;
mod submit;

pub use cleanup::{delete_pending_changelists, CleanupReport, SkippedChangelist};
pub use rollback::rollback_to_revision;
pub use submit::{submit, validate_description, SubmitOutcome, DESCRIPTION_PLACEHOLDER};

use thiserror::Error;

use crate::p4::P4Error;

/// Errors from the changelist workflows
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Description is empty, unedited placeholder text, or contains the
    /// reserved `<`/`>` characters. Never reaches the server; the
    /// caller should re-prompt.
    #[error("description is empty, unedited, or contains '<' or '>'")]
    InvalidDescription,

    /// Every requested file was stale; there is nothing left to submit,
    /// and no empty changelist is sent to the server.
    #[error("none of the requested files remain in the pending changelist")]
    NothingToSubmit,

    /// A server operation failed; carries the underlying client error
    /// with its warning/error severity.
    #[error(transparent)]
    Client(#[from] P4Error),
}
