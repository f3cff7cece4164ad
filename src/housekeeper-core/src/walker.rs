//! Folder walker: runs one folder policy over every file below its path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::Serialize;
use walkdir::WalkDir;

use crate::action::{ActionExecutor, ActionOutcome};
use crate::aging::{is_stale, modification_time};
use crate::error::{FileError, WalkError};
use crate::events::RunLog;
use crate::policy::{Action, FolderPolicy};

/// Counters for one folder's pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderReport {
    pub path: PathBuf,
    pub action: Action,
    /// Regular files found below the folder.
    pub files_seen: usize,
    /// Files that passed the extension filter.
    pub files_matched: usize,
    /// Matched files older than the threshold.
    pub files_stale: usize,
    pub compressed: usize,
    pub deleted: usize,
    /// Stale files skipped because they already were archives.
    pub already_compressed: usize,
    /// Per-entry and per-file failures (non-fatal).
    pub errors: usize,
}

impl FolderReport {
    fn new(policy: &FolderPolicy) -> Self {
        Self {
            path: policy.path.clone(),
            action: policy.action,
            files_seen: 0,
            files_matched: 0,
            files_stale: 0,
            compressed: 0,
            deleted: 0,
            already_compressed: 0,
            errors: 0,
        }
    }

    fn record(&mut self, outcome: &ActionOutcome) {
        match outcome {
            ActionOutcome::Compressed { .. } => self.compressed += 1,
            ActionOutcome::Deleted => self.deleted += 1,
            ActionOutcome::AlreadyCompressed => self.already_compressed += 1,
        }
    }

    /// Whether every file in the pass was handled without error.
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

/// Walks a folder and applies its policy file by file.
pub struct FolderWalker<'a> {
    log: &'a dyn RunLog,
    executor: ActionExecutor<'a>,
}

impl<'a> FolderWalker<'a> {
    pub fn new(log: &'a dyn RunLog) -> Self {
        Self {
            log,
            executor: ActionExecutor::new(log),
        }
    }

    /// Run `policy`, judging staleness against the current time.
    pub fn run(&self, policy: &FolderPolicy) -> Result<FolderReport, WalkError> {
        self.run_at(policy, SystemTime::now())
    }

    /// Run `policy`, judging staleness against `now` for every file.
    ///
    /// Per-file failures are logged and counted; only a folder that cannot be
    /// enumerated at all returns an error.
    pub fn run_at(&self, policy: &FolderPolicy, now: SystemTime) -> Result<FolderReport, WalkError> {
        check_folder(&policy.path)?;

        let mut report = FolderReport::new(policy);
        let candidates = self.collect_candidates(policy, &mut report)?;
        let threshold = policy.age_threshold.as_duration();

        for path in candidates {
            match self.process_file(policy.action, &path, now, threshold) {
                Ok(None) => {}
                Ok(Some(outcome)) => {
                    report.files_stale += 1;
                    report.record(&outcome);
                }
                Err(FileError::Stat(e)) => {
                    report.errors += 1;
                    self.log.stat_failed(&e);
                }
                Err(FileError::Action(_)) => {
                    // already logged by the executor
                    report.files_stale += 1;
                    report.errors += 1;
                }
            }
        }

        Ok(report)
    }

    /// Regular files below the policy path that pass the extension filter.
    ///
    /// Gathered up front so archives written during the pass are not revisited.
    fn collect_candidates(
        &self,
        policy: &FolderPolicy,
        report: &mut FolderReport,
    ) -> Result<Vec<PathBuf>, WalkError> {
        let mut candidates = Vec::new();

        for entry in WalkDir::new(&policy.path).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(WalkError::Inaccessible {
                        path: policy.path.clone(),
                        source: io::Error::from(e),
                    });
                }
                Err(e) => {
                    report.errors += 1;
                    self.log.entry_failed(&policy.path, &e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            report.files_seen += 1;

            if policy.extensions.matches(entry.file_name()) {
                report.files_matched += 1;
                candidates.push(entry.into_path());
            }
        }

        Ok(candidates)
    }

    fn process_file(
        &self,
        action: Action,
        path: &Path,
        now: SystemTime,
        threshold: Duration,
    ) -> Result<Option<ActionOutcome>, FileError> {
        let modified = modification_time(path)?;
        if !is_stale(modified, now, threshold) {
            return Ok(None);
        }
        Ok(Some(self.executor.apply(action, path)?))
    }
}

fn check_folder(path: &Path) -> Result<(), WalkError> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(WalkError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(WalkError::NotFound(path.to_path_buf()))
        }
        Err(source) => Err(WalkError::Inaccessible {
            path: path.to_path_buf(),
            source,
        }),
    }
}
