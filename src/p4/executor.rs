//! p4 command executor
//!
//! Handles running p4 commands and capturing their output.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use super::constants::{self, errors, flags};
use super::parser::{self, TaggedRecord};
use super::P4Error;

/// Executor for p4 commands
///
/// Carries the connection settings applied to every invocation as
/// global flags (`-p`, `-u`, `-c`, and `-d` once the client root is
/// known).
#[derive(Debug, Clone)]
pub struct P4Executor {
    port: String,
    user: String,
    client: String,
    cwd: Option<PathBuf>,
}

impl P4Executor {
    /// Create an executor for the given connection settings
    pub fn new(
        port: impl Into<String>,
        user: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        Self {
            port: port.into(),
            user: user.into(),
            client: client.into(),
            cwd: None,
        }
    }

    /// Connected user name
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Connected client workspace name
    pub fn client(&self) -> &str {
        &self.client
    }

    /// Working directory applied with `-d`, once known
    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Set the working directory for subsequent commands
    ///
    /// Called once at connect time with the client root, so relative
    /// and wildcard paths resolve inside the workspace.
    pub fn set_cwd(&mut self, path: PathBuf) {
        self.cwd = Some(path);
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(constants::P4_COMMAND);
        cmd.arg(flags::PORT).arg(&self.port);
        cmd.arg(flags::USER).arg(&self.user);
        cmd.arg(flags::CLIENT).arg(&self.client);
        if let Some(ref cwd) = self.cwd {
            cmd.arg(flags::DIRECTORY).arg(cwd);
        }
        cmd
    }

    /// Run a p4 command and capture stdout
    pub fn run(&self, args: &[&str]) -> Result<String, P4Error> {
        let output = self
            .command()
            .args(args)
            .output()
            .map_err(map_spawn_error)?;
        finish(output)
    }

    /// Run a p4 command with tagged output and parse the records
    pub fn run_tagged(&self, args: &[&str]) -> Result<Vec<TaggedRecord>, P4Error> {
        let output = self
            .command()
            .arg(flags::TAGGED)
            .args(args)
            .output()
            .map_err(map_spawn_error)?;
        Ok(parser::parse_tagged(&finish(output)?))
    }

    /// Run a p4 command feeding a form (or password) to stdin
    ///
    /// Used for `change -i`, `submit -i`, `login`, and `trust -i`, all
    /// of which read their input from standard input.
    pub fn run_with_input(&self, args: &[&str], input: &str) -> Result<String, P4Error> {
        let mut child = self
            .command()
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(map_spawn_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        finish(output)
    }
}

fn map_spawn_error(e: std::io::Error) -> P4Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        P4Error::P4NotFound
    } else {
        P4Error::IoError(e)
    }
}

/// Turn a finished process into stdout text or a classified error
fn finish(output: Output) -> Result<String, P4Error> {
    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let exit_code = output.status.code().unwrap_or(-1);

    if stderr.contains(errors::TRUST_REQUIRED) {
        if let Some(fingerprint) = parser::extract_trust_fingerprint(&stderr) {
            return Err(P4Error::TrustRequired { fingerprint });
        }
    }
    if stderr.contains(errors::CONNECT_FAILED) {
        return Err(P4Error::ConnectionFailed(stderr.trim().to_string()));
    }
    if stderr.contains(errors::LOGIN_REQUIRED) || stderr.contains(errors::SESSION_EXPIRED) {
        return Err(P4Error::LoginRequired);
    }
    if stderr.contains(errors::UNKNOWN_CLIENT) {
        return Err(P4Error::WorkspaceMissing);
    }

    Err(P4Error::CommandFailed {
        severity: parser::classify_severity(&stderr),
        message: stderr,
        exit_code,
    })
}
