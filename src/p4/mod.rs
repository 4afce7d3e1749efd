//! Perforce command execution layer
//!
//! This module handles executing p4 commands and parsing their output.

pub mod constants;
mod executor;
/// Parser module (public for integration testing)
pub mod parser;

mod client;
mod session;

pub use client::PerforceClient;
pub use executor::P4Executor;
pub use session::{ConnectionSettings, Session};

use std::io;
use thiserror::Error;

/// Severity of a failed p4 command
///
/// The p4 server distinguishes warning-level outcomes (nothing was
/// damaged, the request was just a no-op or partially ignored) from
/// hard errors. Callers surface the two differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// Errors that can occur when executing p4 commands
#[derive(Error, Debug)]
pub enum P4Error {
    #[error("p4 is not installed or not in PATH")]
    P4NotFound,

    #[error("cannot connect to Perforce server: {0}")]
    ConnectionFailed(String),

    #[error("not logged in, or the session ticket has expired")]
    LoginRequired,

    #[error("server certificate not trusted (fingerprint {fingerprint})")]
    TrustRequired { fingerprint: String },

    #[error("no client workspace is mapped for this host")]
    WorkspaceMissing,

    #[error("p4 command failed (exit code {exit_code}): {message}")]
    CommandFailed {
        message: String,
        exit_code: i32,
        severity: Severity,
    },

    #[error("failed to parse p4 output: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl P4Error {
    /// Severity of this error, for display routing
    pub fn severity(&self) -> Severity {
        match self {
            P4Error::CommandFailed { severity, .. } => *severity,
            _ => Severity::Error,
        }
    }

    /// True if the server reported a warning rather than a hard error
    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}
