//! Mock Perforce client for workflow testing
//!
//! These are test utilities - not all may be used in current tests but
//! are available for future test development.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use p4flow::model::{
    ChangeSpec, FileStat, OpenedFile, PendingAction, PendingChangelist, RevisionRecord,
};
use p4flow::p4::{P4Error, PerforceClient, Severity};

/// Call record for `submit_change`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitCall {
    pub spec: ChangeSpec,
    pub reopen: bool,
}

/// Call record for `set_read_only`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetReadOnlyCall {
    pub paths: Vec<PathBuf>,
    pub read_only: bool,
}

/// Call record for `retrieve_revision`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrieveCall {
    pub path: String,
    pub revision: u32,
    pub destination: PathBuf,
}

/// Recording mock Perforce client
///
/// Features:
/// - Configurable responses for opened files, change forms, fstat, and
///   history
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPerforceClient {
    user: String,
    workspace: String,
    opened: Mutex<Vec<OpenedFile>>,
    pending_change: Mutex<ChangeSpec>,
    file_stats: Mutex<HashMap<String, FileStat>>,
    histories: Mutex<HashMap<String, Vec<RevisionRecord>>>,
    pending_lists: Mutex<Vec<PendingChangelist>>,
    // Call tracking
    opened_queries: Mutex<u32>,
    submit_calls: Mutex<Vec<SubmitCall>>,
    set_read_only_calls: Mutex<Vec<SetReadOnlyCall>>,
    open_for_edit_calls: Mutex<Vec<String>>,
    retrieve_calls: Mutex<Vec<RetrieveCall>>,
    sync_calls: Mutex<Vec<(String, bool)>>,
    unlock_calls: Mutex<Vec<u32>>,
    revert_calls: Mutex<Vec<u32>>,
    delete_calls: Mutex<Vec<u32>>,
    // Error injection
    error_on_submit: Mutex<Option<String>>,
    fail_delete_for: Mutex<HashSet<u32>>,
    fail_read_only_for: Mutex<HashSet<PathBuf>>,
}

impl MockPerforceClient {
    pub fn new(user: &str, workspace: &str) -> Self {
        Self {
            user: user.to_string(),
            workspace: workspace.to_string(),
            opened: Mutex::new(Vec::new()),
            pending_change: Mutex::new(ChangeSpec {
                number: None,
                user: user.to_string(),
                workspace: workspace.to_string(),
                status: "new".to_string(),
                description: "<enter description here>".to_string(),
                files: Vec::new(),
            }),
            file_stats: Mutex::new(HashMap::new()),
            histories: Mutex::new(HashMap::new()),
            pending_lists: Mutex::new(Vec::new()),
            opened_queries: Mutex::new(0),
            submit_calls: Mutex::new(Vec::new()),
            set_read_only_calls: Mutex::new(Vec::new()),
            open_for_edit_calls: Mutex::new(Vec::new()),
            retrieve_calls: Mutex::new(Vec::new()),
            sync_calls: Mutex::new(Vec::new()),
            unlock_calls: Mutex::new(Vec::new()),
            revert_calls: Mutex::new(Vec::new()),
            delete_calls: Mutex::new(Vec::new()),
            error_on_submit: Mutex::new(None),
            fail_delete_for: Mutex::new(HashSet::new()),
            fail_read_only_for: Mutex::new(HashSet::new()),
        }
    }

    /// Register an opened file; also registers a matching fstat record
    pub fn add_opened(&self, depot_path: &str, client_path: &str, action: PendingAction) {
        self.opened.lock().unwrap().push(OpenedFile {
            depot_path: depot_path.to_string(),
            client_path: client_path.to_string(),
            file_type: "binary".to_string(),
            action,
            user: self.user.clone(),
            workspace: self.workspace.clone(),
            locked: false,
        });
        self.add_stat(depot_path, client_path, Some(action));
    }

    /// Register an fstat record without opening the file
    pub fn add_stat(&self, depot_path: &str, client_path: &str, action: Option<PendingAction>) {
        let stat = FileStat {
            depot_path: depot_path.to_string(),
            client_path: client_path.to_string(),
            head_revision: Some(5),
            have_revision: Some(5),
            file_type: "binary".to_string(),
            action,
        };
        let mut stats = self.file_stats.lock().unwrap();
        stats.insert(depot_path.to_string(), stat.clone());
        stats.insert(client_path.to_string(), stat);
    }

    pub fn add_history(&self, path: &str, revisions: Vec<RevisionRecord>) {
        self.histories
            .lock()
            .unwrap()
            .insert(path.to_string(), revisions);
    }

    pub fn add_pending_list(&self, number: u32, user: &str, workspace: &str) {
        self.pending_lists.lock().unwrap().push(PendingChangelist {
            number,
            user: user.to_string(),
            workspace: workspace.to_string(),
            status: "pending".to_string(),
            description: "WIP".to_string(),
        });
    }

    pub fn inject_submit_error(&self, message: &str) {
        *self.error_on_submit.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_delete_of(&self, number: u32) {
        self.fail_delete_for.lock().unwrap().insert(number);
    }

    pub fn fail_read_only_repair_of(&self, client_path: &str) {
        self.fail_read_only_for
            .lock()
            .unwrap()
            .insert(PathBuf::from(client_path));
    }

    pub fn opened_query_count(&self) -> u32 {
        *self.opened_queries.lock().unwrap()
    }

    pub fn submit_calls(&self) -> Vec<SubmitCall> {
        self.submit_calls.lock().unwrap().clone()
    }

    pub fn set_read_only_calls(&self) -> Vec<SetReadOnlyCall> {
        self.set_read_only_calls.lock().unwrap().clone()
    }

    pub fn open_for_edit_calls(&self) -> Vec<String> {
        self.open_for_edit_calls.lock().unwrap().clone()
    }

    pub fn retrieve_calls(&self) -> Vec<RetrieveCall> {
        self.retrieve_calls.lock().unwrap().clone()
    }

    pub fn unlock_calls(&self) -> Vec<u32> {
        self.unlock_calls.lock().unwrap().clone()
    }

    pub fn revert_calls(&self) -> Vec<u32> {
        self.revert_calls.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<u32> {
        self.delete_calls.lock().unwrap().clone()
    }

    fn command_failed(message: &str) -> P4Error {
        P4Error::CommandFailed {
            message: message.to_string(),
            exit_code: 1,
            severity: Severity::Error,
        }
    }
}

impl PerforceClient for MockPerforceClient {
    fn user(&self) -> &str {
        &self.user
    }

    fn workspace(&self) -> &str {
        &self.workspace
    }

    fn fetch_pending_change(&self) -> Result<ChangeSpec, P4Error> {
        Ok(self.pending_change.lock().unwrap().clone())
    }

    fn opened_files(&self) -> Result<Vec<OpenedFile>, P4Error> {
        *self.opened_queries.lock().unwrap() += 1;
        Ok(self.opened.lock().unwrap().clone())
    }

    fn submit_change(&self, spec: &ChangeSpec, reopen: bool) -> Result<(), P4Error> {
        self.submit_calls.lock().unwrap().push(SubmitCall {
            spec: spec.clone(),
            reopen,
        });
        if let Some(message) = self.error_on_submit.lock().unwrap().as_ref() {
            return Err(Self::command_failed(message));
        }
        if !reopen {
            self.opened.lock().unwrap().clear();
        }
        Ok(())
    }

    fn file_stat(&self, path: &str) -> Result<FileStat, P4Error> {
        self.file_stats
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| Self::command_failed(&format!("{path} - no such file(s).")))
    }

    fn file_history(&self, path: &str) -> Result<Vec<RevisionRecord>, P4Error> {
        self.histories
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| Self::command_failed(&format!("{path} - no such file(s).")))
    }

    fn retrieve_revision(
        &self,
        path: &str,
        revision: u32,
        destination: &Path,
    ) -> Result<(), P4Error> {
        self.retrieve_calls.lock().unwrap().push(RetrieveCall {
            path: path.to_string(),
            revision,
            destination: destination.to_path_buf(),
        });
        Ok(())
    }

    fn open_for_edit(&self, path: &str) -> Result<(), P4Error> {
        self.open_for_edit_calls
            .lock()
            .unwrap()
            .push(path.to_string());
        // Opening a tracked file puts it in the opened list, as on a
        // real server
        let stat = self.file_stat(path)?;
        self.opened.lock().unwrap().push(OpenedFile {
            depot_path: stat.depot_path,
            client_path: stat.client_path,
            file_type: stat.file_type,
            action: PendingAction::Edit,
            user: self.user.clone(),
            workspace: self.workspace.clone(),
            locked: false,
        });
        Ok(())
    }

    fn sync(&self, path: &str, force: bool) -> Result<(), P4Error> {
        self.sync_calls
            .lock()
            .unwrap()
            .push((path.to_string(), force));
        Ok(())
    }

    fn pending_changelists(&self) -> Result<Vec<PendingChangelist>, P4Error> {
        Ok(self.pending_lists.lock().unwrap().clone())
    }

    fn unlock_changelist(&self, number: u32) -> Result<(), P4Error> {
        self.unlock_calls.lock().unwrap().push(number);
        Ok(())
    }

    fn revert_changelist(&self, number: u32) -> Result<(), P4Error> {
        self.revert_calls.lock().unwrap().push(number);
        Ok(())
    }

    fn delete_changelist(&self, number: u32) -> Result<(), P4Error> {
        self.delete_calls.lock().unwrap().push(number);
        if self.fail_delete_for.lock().unwrap().contains(&number) {
            return Err(Self::command_failed(&format!(
                "Change {number} has open file(s) associated with it and can't be deleted."
            )));
        }
        Ok(())
    }

    fn set_read_only(&self, paths: &[PathBuf], read_only: bool) -> Result<(), P4Error> {
        self.set_read_only_calls.lock().unwrap().push(SetReadOnlyCall {
            paths: paths.to_vec(),
            read_only,
        });
        let failing = self.fail_read_only_for.lock().unwrap();
        if paths.iter().any(|path| failing.contains(path)) {
            return Err(P4Error::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "operation not permitted",
            )));
        }
        Ok(())
    }
}
