//! Version-control client capability surface
//!
//! [`PerforceClient`] is the seam between the workflow layer and the
//! server: the workflow only ever talks to this trait, so tests can run
//! it against a recording mock while production uses [`Session`].

use std::fs;
use std::path::{Path, PathBuf};

use super::constants::{commands, flags, special, CLIENT_WILDCARD};
use super::parser::Parser;
use super::session::Session;
use super::P4Error;
use crate::model::{ChangeSpec, FileStat, OpenedFile, PendingChangelist, RevisionRecord};

/// Operations the workflow layer needs from a connected Perforce client
pub trait PerforceClient {
    /// Connected user name
    fn user(&self) -> &str;

    /// Connected client workspace name
    fn workspace(&self) -> &str;

    /// Fetch the default pending changelist form (`p4 change -o`)
    fn fetch_pending_change(&self) -> Result<ChangeSpec, P4Error>;

    /// List files opened by this user in this workspace
    fn opened_files(&self) -> Result<Vec<OpenedFile>, P4Error>;

    /// Submit a change form, optionally reopening the files afterward
    fn submit_change(&self, spec: &ChangeSpec, reopen: bool) -> Result<(), P4Error>;

    /// Query file status (`p4 fstat`)
    fn file_stat(&self, path: &str) -> Result<FileStat, P4Error>;

    /// Fetch a file's revision history, newest first
    fn file_history(&self, path: &str) -> Result<Vec<RevisionRecord>, P4Error>;

    /// Write a specific revision's content to a local destination
    fn retrieve_revision(
        &self,
        path: &str,
        revision: u32,
        destination: &Path,
    ) -> Result<(), P4Error>;

    /// Open a file for edit
    fn open_for_edit(&self, path: &str) -> Result<(), P4Error>;

    /// Sync a path to the latest revision
    fn sync(&self, path: &str, force: bool) -> Result<(), P4Error>;

    /// List pending changelists on the server
    fn pending_changelists(&self) -> Result<Vec<PendingChangelist>, P4Error>;

    /// Release locks held by a changelist
    fn unlock_changelist(&self, number: u32) -> Result<(), P4Error>;

    /// Revert every file opened under a changelist
    fn revert_changelist(&self, number: u32) -> Result<(), P4Error>;

    /// Delete an emptied pending changelist
    fn delete_changelist(&self, number: u32) -> Result<(), P4Error>;

    /// Set or clear the read-only bit on local files
    fn set_read_only(&self, paths: &[PathBuf], read_only: bool) -> Result<(), P4Error>;
}

impl PerforceClient for Session {
    fn user(&self) -> &str {
        Session::user(self)
    }

    fn workspace(&self) -> &str {
        Session::workspace(self)
    }

    fn fetch_pending_change(&self) -> Result<ChangeSpec, P4Error> {
        let form = self.executor().run(&[commands::CHANGE, flags::FORM_OUT])?;
        Parser::parse_change_spec(&form)
    }

    fn opened_files(&self) -> Result<Vec<OpenedFile>, P4Error> {
        let records = self.executor().run_tagged(&[
            commands::OPENED,
            flags::OPENED_USER,
            Session::user(self),
            flags::OPENED_CLIENT,
            Session::workspace(self),
            CLIENT_WILDCARD,
        ])?;
        Parser::parse_opened(&records, Session::user(self), Session::workspace(self))
    }

    fn submit_change(&self, spec: &ChangeSpec, reopen: bool) -> Result<(), P4Error> {
        let form = Parser::render_change_spec(spec);
        let args: &[&str] = if reopen {
            &[commands::SUBMIT, flags::REOPEN, flags::FORM_IN]
        } else {
            &[commands::SUBMIT, flags::FORM_IN]
        };
        self.executor().run_with_input(args, &form)?;
        Ok(())
    }

    fn file_stat(&self, path: &str) -> Result<FileStat, P4Error> {
        let records = self.executor().run_tagged(&[commands::FSTAT, path])?;
        let record = records
            .first()
            .ok_or_else(|| P4Error::ParseError(format!("no fstat record for {path}")))?;
        Parser::parse_fstat(record)
    }

    fn file_history(&self, path: &str) -> Result<Vec<RevisionRecord>, P4Error> {
        let records = self
            .executor()
            .run_tagged(&[commands::FILELOG, flags::LONG_OUTPUT, path])?;
        Parser::parse_filelog(&records)
    }

    fn retrieve_revision(
        &self,
        path: &str,
        revision: u32,
        destination: &Path,
    ) -> Result<(), P4Error> {
        let destination = destination.to_string_lossy();
        let file_revision = format!("{path}#{revision}");
        self.executor().run(&[
            commands::PRINT,
            flags::OUTPUT_FILE,
            &destination,
            &file_revision,
        ])?;
        Ok(())
    }

    fn open_for_edit(&self, path: &str) -> Result<(), P4Error> {
        self.executor().run(&[commands::EDIT, path])?;
        Ok(())
    }

    fn sync(&self, path: &str, force: bool) -> Result<(), P4Error> {
        let args: &[&str] = if force {
            &[commands::SYNC, flags::FORCE, path]
        } else {
            &[commands::SYNC, path]
        };
        self.executor().run(args)?;
        Ok(())
    }

    fn pending_changelists(&self) -> Result<Vec<PendingChangelist>, P4Error> {
        let records = self.executor().run_tagged(&[
            commands::CHANGES,
            flags::LONG_OUTPUT,
            flags::STATUS,
            special::PENDING_STATUS,
        ])?;
        Parser::parse_pending_changes(&records)
    }

    fn unlock_changelist(&self, number: u32) -> Result<(), P4Error> {
        let number = number.to_string();
        self.executor()
            .run(&[commands::UNLOCK, flags::CHANGELIST, &number])?;
        Ok(())
    }

    fn revert_changelist(&self, number: u32) -> Result<(), P4Error> {
        let number = number.to_string();
        self.executor().run(&[
            commands::REVERT,
            flags::CHANGELIST,
            &number,
            CLIENT_WILDCARD,
        ])?;
        Ok(())
    }

    fn delete_changelist(&self, number: u32) -> Result<(), P4Error> {
        let number = number.to_string();
        self.executor()
            .run(&[commands::CHANGE, flags::DELETE, &number])?;
        Ok(())
    }

    fn set_read_only(&self, paths: &[PathBuf], read_only: bool) -> Result<(), P4Error> {
        for path in paths {
            let mut perms = fs::metadata(path)?.permissions();
            apply_read_only(&mut perms, read_only);
            fs::set_permissions(path, perms)?;
        }
        Ok(())
    }
}

/// File operations used by the CLI front-end only
impl Session {
    /// Add files to the depot
    pub fn add_files(&self, paths: &[String]) -> Result<String, P4Error> {
        self.run_on_files(commands::ADD, &[], paths)
    }

    /// Mark files for delete
    pub fn delete_files(&self, paths: &[String]) -> Result<String, P4Error> {
        self.run_on_files(commands::DELETE, &[], paths)
    }

    /// Revert files; with `keep_local` the workspace content is left alone
    pub fn revert_files(&self, paths: &[String], keep_local: bool) -> Result<String, P4Error> {
        let extra: &[&str] = if keep_local { &[flags::KEEP_LOCAL] } else { &[] };
        self.run_on_files(commands::REVERT, extra, paths)
    }

    /// Lock opened files against concurrent submits
    pub fn lock_files(&self, paths: &[String]) -> Result<String, P4Error> {
        self.run_on_files(commands::LOCK, &[], paths)
    }

    fn run_on_files(
        &self,
        command: &str,
        extra_flags: &[&str],
        paths: &[String],
    ) -> Result<String, P4Error> {
        let mut args = vec![command];
        args.extend_from_slice(extra_flags);
        args.extend(paths.iter().map(String::as_str));
        self.executor().run(&args)
    }
}

fn apply_read_only(perms: &mut fs::Permissions, read_only: bool) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = perms.mode();
        if read_only {
            perms.set_mode(mode & !0o222);
        } else {
            perms.set_mode(mode | 0o200);
        }
    }
    #[cfg(not(unix))]
    perms.set_readonly(read_only);
}
