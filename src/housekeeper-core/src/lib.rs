//! Folder housekeeping policy engine.
//!
//! Walks configured folders and applies a terminal action to every regular
//! file whose extension matches the folder's filter and whose age exceeds the
//! folder's threshold.
//!
//! # Features
//!
//! - **Config Loader**: JSON document with one entry per monitored folder
//! - **Extension Matcher**: exact, case-sensitive extension allow-list
//! - **Aging Filter**: strict `age > threshold` staleness check
//! - **Action Executor**: gzip-in-place (crash safe) or delete
//! - **Folder Walker / Driver**: file → folder → run error isolation
//!
//! # Example
//!
//! ```rust,no_run
//! use housekeeper_core::{Housekeeper, RunOutcome, TracingRunLog};
//! use std::path::Path;
//!
//! let log = TracingRunLog;
//! let summary = Housekeeper::new(&log).run_from_config(Path::new("HousekeepingFilesFolders.json"));
//! if summary.outcome == RunOutcome::Aborted {
//!     std::process::exit(1);
//! }
//! ```

pub mod action;
pub mod aging;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod matcher;
pub mod policy;
pub mod walker;

pub use action::{ARCHIVE_EXTENSION, ActionExecutor, ActionOutcome, archive_path};
pub use aging::{AgeThreshold, is_stale, modification_time};
pub use config::{ExtensionList, FolderConfig, HousekeepingConfig};
pub use driver::{FailedFolder, Housekeeper, RunOutcome, RunSummary};
pub use error::{ActionError, ConfigError, FileError, StatError, WalkError};
pub use events::{MemoryRunLog, RunEvent, RunLog, TracingRunLog};
pub use matcher::{ExtensionFilter, file_extension};
pub use policy::{Action, FolderPolicy};
pub use walker::{FolderReport, FolderWalker};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "HousekeepingFilesFolders.json";
