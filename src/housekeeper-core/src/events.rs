//! Run log: the reporting seam between the engine and whatever records it.
//!
//! The engine never touches a global logger. A [`RunLog`] is constructed by
//! the caller and handed by reference to the driver, the walker and the
//! executor. [`TracingRunLog`] forwards to `tracing`; [`MemoryRunLog`]
//! keeps events in memory for inspection.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::action::ActionOutcome;
use crate::driver::{RunOutcome, RunSummary};
use crate::error::{ActionError, ConfigError, StatError, WalkError};
use crate::policy::{Action, FolderPolicy};
use crate::walker::FolderReport;

/// Receiver of every significant event of a housekeeping run.
pub trait RunLog {
    /// A run is starting from the given configuration file.
    fn run_started(&self, config_path: &Path);
    /// The configuration could not be loaded; nothing will be touched.
    fn run_aborted(&self, error: &ConfigError);
    /// The run is over.
    fn run_finished(&self, summary: &RunSummary);

    fn folder_started(&self, policy: &FolderPolicy);
    /// A configured extension lacks a leading `.` and can never match.
    fn extension_unreachable(&self, folder: &Path, extension: &str);
    fn folder_finished(&self, report: &FolderReport);
    fn folder_failed(&self, error: &WalkError);

    /// An entry below the folder could not be read; the walk continues.
    fn entry_failed(&self, folder: &Path, error: &walkdir::Error);
    fn stat_failed(&self, error: &StatError);
    fn action_succeeded(&self, path: &Path, outcome: &ActionOutcome);
    fn action_failed(&self, action: Action, error: &ActionError);
}

/// Milliseconds in `elapsed`, saturating at `u64::MAX`.
fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Production run log backed by `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRunLog;

impl RunLog for TracingRunLog {
    fn run_started(&self, config_path: &Path) {
        info!(config = %config_path.display(), "Housekeeping process started.");
    }

    fn run_aborted(&self, error: &ConfigError) {
        error!(fatal = true, error = %error, "Failed to complete housekeeping.");
    }

    fn run_finished(&self, summary: &RunSummary) {
        let elapsed_ms = elapsed_millis(summary.elapsed);
        match summary.outcome {
            RunOutcome::Clean => info!(
                folders = summary.folders.len(),
                compressed = summary.total_compressed(),
                deleted = summary.total_deleted(),
                elapsed_ms,
                "Housekeeping process completed."
            ),
            RunOutcome::CompletedWithErrors => warn!(
                folders = summary.folders.len(),
                failed_folders = summary.failed_folders.len(),
                file_errors = summary.total_file_errors(),
                compressed = summary.total_compressed(),
                deleted = summary.total_deleted(),
                elapsed_ms,
                "Housekeeping process completed with errors."
            ),
            RunOutcome::Aborted => error!(
                fatal = true,
                elapsed_ms,
                "Housekeeping process aborted before start."
            ),
        }
    }

    fn folder_started(&self, policy: &FolderPolicy) {
        let extensions: Vec<&str> = policy.extensions.iter().collect();
        info!(
            path = %policy.path.display(),
            action = %policy.action,
            extensions = ?extensions,
            age_limit = %policy.age_threshold,
            "Processing folder"
        );
    }

    fn extension_unreachable(&self, folder: &Path, extension: &str) {
        warn!(
            path = %folder.display(),
            extension,
            "Configured extension has no leading '.' and will never match"
        );
    }

    fn folder_finished(&self, report: &FolderReport) {
        info!(
            path = %report.path.display(),
            files_seen = report.files_seen,
            files_matched = report.files_matched,
            files_stale = report.files_stale,
            compressed = report.compressed,
            deleted = report.deleted,
            errors = report.errors,
            "Folder processed"
        );
    }

    fn folder_failed(&self, error: &WalkError) {
        error!(
            path = %error.path().display(),
            error = %error,
            "Error processing folder"
        );
    }

    fn entry_failed(&self, folder: &Path, error: &walkdir::Error) {
        error!(
            folder = %folder.display(),
            path = ?error.path(),
            error = %error,
            "Unable to read directory entry"
        );
    }

    fn stat_failed(&self, error: &StatError) {
        error!(path = %error.path.display(), error = %error.source, "Unable to get the age of file");
    }

    fn action_succeeded(&self, path: &Path, outcome: &ActionOutcome) {
        match outcome {
            ActionOutcome::Compressed { archive } => {
                info!(path = %path.display(), archive = %archive.display(), "Gzipped file");
            }
            ActionOutcome::Deleted => info!(path = %path.display(), "Deleted file"),
            ActionOutcome::AlreadyCompressed => {
                debug!(path = %path.display(), "Skipping already compressed file");
            }
        }
    }

    fn action_failed(&self, action: Action, error: &ActionError) {
        error!(
            action = %action,
            path = %error.path().display(),
            error = %error,
            "Housekeeping action failed"
        );
    }
}

/// Event recorded by [`MemoryRunLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    RunStarted(PathBuf),
    RunAborted(String),
    RunFinished(RunOutcome),
    FolderStarted(PathBuf),
    ExtensionUnreachable { folder: PathBuf, extension: String },
    FolderFinished(PathBuf),
    FolderFailed { path: PathBuf, error: String },
    EntryFailed { folder: PathBuf, error: String },
    StatFailed(PathBuf),
    Compressed { path: PathBuf, archive: PathBuf },
    Deleted(PathBuf),
    AlreadyCompressed(PathBuf),
    ActionFailed { action: Action, path: PathBuf },
}

/// Run log that keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemoryRunLog {
    events: RefCell<Vec<RunEvent>>,
}

impl MemoryRunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<RunEvent> {
        self.events.borrow().clone()
    }

    fn push(&self, event: RunEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl RunLog for MemoryRunLog {
    fn run_started(&self, config_path: &Path) {
        self.push(RunEvent::RunStarted(config_path.to_path_buf()));
    }

    fn run_aborted(&self, error: &ConfigError) {
        self.push(RunEvent::RunAborted(error.to_string()));
    }

    fn run_finished(&self, summary: &RunSummary) {
        self.push(RunEvent::RunFinished(summary.outcome));
    }

    fn folder_started(&self, policy: &FolderPolicy) {
        self.push(RunEvent::FolderStarted(policy.path.clone()));
    }

    fn extension_unreachable(&self, folder: &Path, extension: &str) {
        self.push(RunEvent::ExtensionUnreachable {
            folder: folder.to_path_buf(),
            extension: extension.to_string(),
        });
    }

    fn folder_finished(&self, report: &FolderReport) {
        self.push(RunEvent::FolderFinished(report.path.clone()));
    }

    fn folder_failed(&self, error: &WalkError) {
        self.push(RunEvent::FolderFailed {
            path: error.path().to_path_buf(),
            error: error.to_string(),
        });
    }

    fn entry_failed(&self, folder: &Path, error: &walkdir::Error) {
        self.push(RunEvent::EntryFailed {
            folder: folder.to_path_buf(),
            error: error.to_string(),
        });
    }

    fn stat_failed(&self, error: &StatError) {
        self.push(RunEvent::StatFailed(error.path.clone()));
    }

    fn action_succeeded(&self, path: &Path, outcome: &ActionOutcome) {
        let path = path.to_path_buf();
        self.push(match outcome {
            ActionOutcome::Compressed { archive } => RunEvent::Compressed {
                path,
                archive: archive.clone(),
            },
            ActionOutcome::Deleted => RunEvent::Deleted(path),
            ActionOutcome::AlreadyCompressed => RunEvent::AlreadyCompressed(path),
        });
    }

    fn action_failed(&self, action: Action, error: &ActionError) {
        self.push(RunEvent::ActionFailed {
            action,
            path: error.path().to_path_buf(),
        });
    }
}
