//! Data models for P4flow
//!
//! This module contains UI-independent data structures representing
//! Perforce concepts like opened files, changelists, and revisions.

mod changelist;
mod file_stat;
mod opened_file;
mod revision;

pub use changelist::{ChangeSpec, PendingChangelist};
pub use file_stat::FileStat;
pub use opened_file::{OpenedFile, PendingAction};
pub use revision::RevisionRecord;
