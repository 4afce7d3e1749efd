//! Server session establishment
//!
//! One authenticated session is created at startup and passed by
//! reference into every workflow invocation; nothing here is global.

use std::path::{Path, PathBuf};

use tracing::info;

use super::constants::{commands, flags};
use super::executor::P4Executor;
use super::P4Error;

/// Connection settings for a Perforce server
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// Server address, e.g. `ssl:perforce:1666`
    pub port: String,
    /// User name
    pub user: String,
    /// Client workspace name
    pub client: String,
}

/// An authenticated session against a Perforce server
///
/// Construction verifies reachability, installs the server fingerprint
/// on first SSL contact, ensures a valid login ticket, and resolves the
/// client workspace root.
#[derive(Debug)]
pub struct Session {
    executor: P4Executor,
    root: PathBuf,
}

impl Session {
    /// Connect and authenticate
    ///
    /// The password is only used when no valid ticket exists; passing
    /// `None` with an expired ticket fails with [`P4Error::LoginRequired`]
    /// so the caller can prompt and retry.
    pub fn connect(settings: &ConnectionSettings, password: Option<&str>) -> Result<Self, P4Error> {
        let mut executor = P4Executor::new(&settings.port, &settings.user, &settings.client);

        // First contact with an SSL endpoint fails until its fingerprint
        // is trusted; install it once and retry.
        let info = match executor.run_tagged(&[commands::INFO]) {
            Err(P4Error::TrustRequired { fingerprint }) => {
                info!(%fingerprint, "trusting server on first use");
                executor.run(&[commands::TRUST, flags::TRUST_INSTALL, &fingerprint])?;
                executor.run_tagged(&[commands::INFO])?
            }
            other => other?,
        };

        let record = info
            .first()
            .ok_or_else(|| P4Error::ParseError("empty p4 info output".to_string()))?;
        let root = record
            .get("clientRoot")
            .ok_or(P4Error::WorkspaceMissing)?
            .to_string();

        match executor.run(&[commands::LOGIN, flags::LOGIN_STATUS]) {
            Ok(_) => {}
            Err(P4Error::LoginRequired) => {
                let password = password.ok_or(P4Error::LoginRequired)?;
                executor.run_with_input(&[commands::LOGIN, flags::ALL_HOSTS], password)?;
                info!(user = executor.user(), "logged in");
            }
            Err(e) => return Err(e),
        }

        let root = PathBuf::from(root);
        executor.set_cwd(root.clone());
        info!(root = %root.display(), client = executor.client(), "session established");

        Ok(Session { executor, root })
    }

    /// The underlying executor
    pub fn executor(&self) -> &P4Executor {
        &self.executor
    }

    /// Connected user name
    pub fn user(&self) -> &str {
        self.executor.user()
    }

    /// Connected client workspace name
    pub fn workspace(&self) -> &str {
        self.executor.client()
    }

    /// Local root directory of the client workspace
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a local path lies inside the client workspace
    ///
    /// File operations refuse paths outside the root; the server would
    /// reject them anyway, but with a far less helpful message.
    pub fn is_path_in_client_root(&self, path: &Path) -> bool {
        path_within(&self.root, path)
    }
}

fn path_within(root: &Path, path: &Path) -> bool {
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    path.starts_with(&root)
}
