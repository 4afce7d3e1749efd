//! P4flow - Perforce changelist workflow tool
//!
//! A command-line client for everyday Perforce changelist work:
//! reconciling and submitting opened files, browsing file history,
//! rolling a file back to an earlier revision, and cleaning up
//! pending changelists.
//!
//! This library provides:
//! - [`cli`]: Interactive command-line front-end
//! - [`model`]: Domain models
//! - [`p4`]: Perforce command execution and parsing
//! - [`workflow`]: Changelist reconciliation and submission logic

pub mod cli;
pub mod model;
pub mod p4;
pub mod workflow;
