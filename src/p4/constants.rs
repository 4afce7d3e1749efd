//! p4-specific constants
//!
//! Centralized definitions for p4 command names, flags, and message patterns.

/// p4 command binary name
pub const P4_COMMAND: &str = "p4";

/// Wildcard matching every file under the client root
pub const CLIENT_WILDCARD: &str = "...";

/// p4 subcommands
pub mod commands {
    pub const ADD: &str = "add";
    pub const CHANGE: &str = "change";
    pub const CHANGES: &str = "changes";
    pub const DELETE: &str = "delete";
    pub const EDIT: &str = "edit";
    pub const FILELOG: &str = "filelog";
    pub const FSTAT: &str = "fstat";
    pub const INFO: &str = "info";
    pub const LOCK: &str = "lock";
    pub const LOGIN: &str = "login";
    pub const OPENED: &str = "opened";
    pub const PRINT: &str = "print";
    pub const REVERT: &str = "revert";
    pub const SUBMIT: &str = "submit";
    pub const SYNC: &str = "sync";
    pub const TRUST: &str = "trust";
    pub const UNLOCK: &str = "unlock";
}

/// p4 command flags
pub mod flags {
    /// Tagged output (global flag, one key/value field per line)
    pub const TAGGED: &str = "-ztag";
    /// Server address (global flag)
    pub const PORT: &str = "-p";
    /// User name (global flag)
    pub const USER: &str = "-u";
    /// Client workspace name (global flag)
    pub const CLIENT: &str = "-c";
    /// Working directory (global flag)
    pub const DIRECTORY: &str = "-d";
    /// Read a form from standard input (`change -i`, `submit -i`)
    pub const FORM_IN: &str = "-i";
    /// Write a form to standard output (`change -o`)
    pub const FORM_OUT: &str = "-o";
    /// Delete (`change -d`)
    pub const DELETE: &str = "-d";
    /// Reopen submitted files for edit (`submit -r`)
    pub const REOPEN: &str = "-r";
    /// Force (`sync -f`)
    pub const FORCE: &str = "-f";
    /// Keep local file content (`revert -k`)
    pub const KEEP_LOCAL: &str = "-k";
    /// Restrict to a changelist (`revert -c`, `unlock -c`)
    pub const CHANGELIST: &str = "-c";
    /// Filter by status (`changes -s`)
    pub const STATUS: &str = "-s";
    /// All-host login ticket (`login -a`)
    pub const ALL_HOSTS: &str = "-a";
    /// Check login ticket status (`login -s`)
    pub const LOGIN_STATUS: &str = "-s";
    /// Install a fingerprint (`trust -i`)
    pub const TRUST_INSTALL: &str = "-i";
    /// Full descriptions (`filelog -l`, `changes -l`)
    pub const LONG_OUTPUT: &str = "-l";
    /// Redirect output to a local file (`print -o`)
    pub const OUTPUT_FILE: &str = "-o";
    /// Filter opened files by user (`opened -u`)
    pub const OPENED_USER: &str = "-u";
    /// Filter opened files by client (`opened -C`)
    pub const OPENED_CLIENT: &str = "-C";
}

/// Special p4 form values
pub mod special {
    /// Changelist number meaning "the default pending changelist"
    pub const NEW_CHANGE: &str = "new";
    /// Status value for an unsubmitted changelist
    pub const PENDING_STATUS: &str = "pending";
}

/// Message patterns in p4 output
///
/// The p4 CLI reports everything on stderr with an exit status; these
/// substrings are the only way to tell failure classes apart.
pub mod errors {
    /// Server unreachable
    pub const CONNECT_FAILED: &str = "Connect to server failed";
    /// Session ticket missing or expired
    pub const LOGIN_REQUIRED: &str = "Perforce password (P4PASSWD) invalid or unset";
    /// Session ticket expired mid-session
    pub const SESSION_EXPIRED: &str = "Your session has expired";
    /// SSL endpoint not yet trusted; stderr carries the fingerprint
    pub const TRUST_REQUIRED: &str = "The authenticity of";
    /// Client spec has no root mapped on this host
    pub const UNKNOWN_CLIENT: &str = "Client unknown";

    /// Patterns that indicate a warning-severity outcome rather than an
    /// error. These correspond to the messages the original P4 API tags
    /// with `[Warning]`.
    pub const WARNING_PATTERNS: &[&str] = &[
        "file(s) up-to-date",
        "no file(s) to submit",
        "file(s) not opened on this client",
        "file(s) not on client",
        "already opened for edit",
    ];
}
