//! Housekeeping driver: runs every folder policy in configuration order.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::HousekeepingConfig;
use crate::error::WalkError;
use crate::events::RunLog;
use crate::policy::FolderPolicy;
use crate::walker::{FolderReport, FolderWalker};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every folder and file was processed without error.
    Clean,
    /// The run finished, but some folders or files failed.
    CompletedWithErrors,
    /// The configuration could not be loaded; nothing was touched.
    Aborted,
}

/// A folder whose policy could not run.
#[derive(Debug)]
pub struct FailedFolder {
    pub path: PathBuf,
    pub error: WalkError,
}

/// Result of a whole run.
#[derive(Debug)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    /// Reports of folders that were walked, in configuration order.
    pub folders: Vec<FolderReport>,
    pub failed_folders: Vec<FailedFolder>,
    pub elapsed: Duration,
}

impl RunSummary {
    fn aborted(elapsed: Duration) -> Self {
        Self {
            outcome: RunOutcome::Aborted,
            folders: Vec::new(),
            failed_folders: Vec::new(),
            elapsed,
        }
    }

    pub fn total_compressed(&self) -> usize {
        self.folders.iter().map(|f| f.compressed).sum()
    }

    pub fn total_deleted(&self) -> usize {
        self.folders.iter().map(|f| f.deleted).sum()
    }

    pub fn total_file_errors(&self) -> usize {
        self.folders.iter().map(|f| f.errors).sum()
    }

    /// False only when the run was aborted before touching any folder.
    pub fn is_success(&self) -> bool {
        self.outcome != RunOutcome::Aborted
    }
}

/// Runs folder policies one after another, isolating their failures.
pub struct Housekeeper<'a> {
    log: &'a dyn RunLog,
}

impl<'a> Housekeeper<'a> {
    pub fn new(log: &'a dyn RunLog) -> Self {
        Self { log }
    }

    /// Load the configuration at `config_path` and run all of its policies.
    ///
    /// A configuration that cannot be loaded aborts the run before any folder
    /// is touched.
    pub fn run_from_config(&self, config_path: &Path) -> RunSummary {
        let start = Instant::now();
        self.log.run_started(config_path);

        match HousekeepingConfig::load(config_path) {
            Ok(config) => self.run_all(&config.policies()),
            Err(e) => {
                self.log.run_aborted(&e);
                let summary = RunSummary::aborted(start.elapsed());
                self.log.run_finished(&summary);
                summary
            }
        }
    }

    /// Run `policies` in order. A failing folder is logged and skipped.
    pub fn run_all(&self, policies: &[FolderPolicy]) -> RunSummary {
        let start = Instant::now();
        let walker = FolderWalker::new(self.log);
        let mut folders = Vec::with_capacity(policies.len());
        let mut failed_folders = Vec::new();

        for policy in policies {
            self.log.folder_started(policy);
            for extension in policy.extensions.unreachable_entries() {
                self.log.extension_unreachable(&policy.path, extension);
            }

            match walker.run(policy) {
                Ok(report) => {
                    self.log.folder_finished(&report);
                    folders.push(report);
                }
                Err(error) => {
                    self.log.folder_failed(&error);
                    failed_folders.push(FailedFolder {
                        path: policy.path.clone(),
                        error,
                    });
                }
            }
        }

        let outcome = if failed_folders.is_empty() && folders.iter().all(FolderReport::is_clean) {
            RunOutcome::Clean
        } else {
            RunOutcome::CompletedWithErrors
        };

        let summary = RunSummary {
            outcome,
            folders,
            failed_folders,
            elapsed: start.elapsed(),
        };
        self.log.run_finished(&summary);
        summary
    }
}
