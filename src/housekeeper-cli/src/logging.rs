//! Log file rotation and subscriber setup.
//!
//! The log file is `<log dir>/housekeeping.log`, appended to across runs.
//! Once it is a day old it is renamed to `housekeeping.log.YYYYMMDD` before
//! the run opens a fresh one.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;

use crate::cli::LogLevel;

/// Default directory for the log file.
pub const DEFAULT_LOG_DIR: &str = "Logs";

/// Name of the active log file.
pub const LOG_FILE_NAME: &str = "housekeeping.log";

/// Age at which the active log file is rotated.
pub const ROTATION_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Where and how verbosely to log.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Directory for the log file; `None` logs to stderr only.
    pub log_dir: Option<PathBuf>,
    pub level: LogLevel,
}

/// Rename `log_path` aside if it is at least [`ROTATION_AGE`] old at `now`.
///
/// Returns the new name of the rotated file. A missing log file is not an
/// error.
pub fn rotate_stale_log(log_path: &Path, now: DateTime<Local>) -> Result<Option<PathBuf>> {
    let metadata = match fs::metadata(log_path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to stat {}", log_path.display()));
        }
    };

    let modified = metadata
        .modified()
        .with_context(|| format!("Failed to read mtime of {}", log_path.display()))?;
    let age = SystemTime::from(now)
        .duration_since(modified)
        .unwrap_or_default();
    if age < ROTATION_AGE {
        return Ok(None);
    }

    let rotated = rotated_path(log_path, now);
    fs::rename(log_path, &rotated).with_context(|| {
        format!(
            "Failed to rotate {} to {}",
            log_path.display(),
            rotated.display()
        )
    })?;
    Ok(Some(rotated))
}

/// `<log>.YYYYMMDD`, or `<log>.YYYYMMDD.N` if that name is already taken.
fn rotated_path(log_path: &Path, now: DateTime<Local>) -> PathBuf {
    let base = format!("{}.{}", log_path.display(), now.format("%Y%m%d"));
    let mut candidate = PathBuf::from(&base);
    let mut n = 1;
    while candidate.exists() {
        candidate = PathBuf::from(format!("{}.{}", base, n));
        n += 1;
    }
    candidate
}

/// Rotate if needed, then open the active log file for appending.
fn open_log_file(log_dir: &Path) -> Result<(File, Option<PathBuf>)> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let log_path = log_dir.join(LOG_FILE_NAME);
    let rotated = rotate_stale_log(&log_path, Local::now())?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
    Ok((file, rotated))
}

/// Run `f` with a subscriber writing to stderr and, if configured, the log file.
///
/// The subscriber is only active for the duration of `f`; buffered file
/// output is flushed before this returns.
pub fn with_logging<T>(settings: &LogSettings, f: impl FnOnce() -> T) -> Result<T> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.as_filter_str()));

    let stderr_layer = fmt::layer().with_writer(io::stderr).with_target(false);

    let (file_layer, guard, rotated) = match &settings.log_dir {
        Some(log_dir) => {
            let (file, rotated) = open_log_file(log_dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard), rotated)
        }
        None => (None, None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer);

    let output = tracing::subscriber::with_default(subscriber, || {
        if let Some(rotated) = &rotated {
            info!(rotated = %rotated.display(), "Rotated previous log file");
        }
        f()
    });

    drop(guard);
    Ok(output)
}
