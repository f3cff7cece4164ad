//! Action executor: compress-in-place or delete a qualifying file.
//!
//! # File System Safety
//!
//! Compression never loses data:
//! 1. The archive is streamed into a hidden temp sibling and fsynced
//! 2. The temp file is renamed onto `<file>.gz`
//! 3. Only then is the original removed
//!
//! A failure before step 2 removes the temp file and leaves the original as
//! it was. A failure in step 3 leaves both files in place.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use housekeeper_utils_file_safety::{ensure_regular_file, write_atomically};

use crate::error::ActionError;
use crate::events::RunLog;
use crate::matcher::file_extension;
use crate::policy::Action;

/// Extension of the archives produced by the compress action.
pub const ARCHIVE_EXTENSION: &str = ".gz";

/// What an action did to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The file was replaced by `archive`.
    Compressed { archive: PathBuf },
    /// The file was removed.
    Deleted,
    /// The file already was an archive; nothing was done.
    AlreadyCompressed,
}

/// Path of the archive for `path`: the same name with `.gz` appended.
pub fn archive_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(ARCHIVE_EXTENSION);
    PathBuf::from(name)
}

fn is_archive(path: &Path) -> bool {
    path.file_name()
        .map(|name| file_extension(&name.to_string_lossy()) == ARCHIVE_EXTENSION)
        .unwrap_or(false)
}

/// Applies terminal actions and reports each result to the run log.
pub struct ActionExecutor<'a> {
    log: &'a dyn RunLog,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(log: &'a dyn RunLog) -> Self {
        Self { log }
    }

    /// Apply `action` to the file at `path`.
    ///
    /// Success and failure are both logged; the error is also returned so the
    /// caller can count it.
    pub fn apply(&self, action: Action, path: &Path) -> Result<ActionOutcome, ActionError> {
        let result = match action {
            Action::Compress => compress_in_place(path),
            Action::Delete => delete_file(path),
        };

        match &result {
            Ok(outcome) => self.log.action_succeeded(path, outcome),
            Err(e) => self.log.action_failed(action, e),
        }
        result
    }
}

/// Replace `path` with a gzip archive `<path>.gz`.
///
/// Files that already carry the `.gz` extension are left alone.
pub fn compress_in_place(path: &Path) -> Result<ActionOutcome, ActionError> {
    compress_in_place_with(path, gzip_stream)
}

fn compress_in_place_with<F>(path: &Path, encode: F) -> Result<ActionOutcome, ActionError>
where
    F: FnOnce(&mut File, &mut BufWriter<File>) -> io::Result<()>,
{
    if is_archive(path) {
        return Ok(ActionOutcome::AlreadyCompressed);
    }

    ensure_regular_file(path).map_err(|source| ActionError::NotRegular {
        path: path.to_path_buf(),
        source,
    })?;

    let compress_err = |source| ActionError::Compress {
        path: path.to_path_buf(),
        source,
    };

    let archive = archive_path(path);
    let mut source = File::open(path).map_err(compress_err)?;
    write_atomically(&archive, |out| encode(&mut source, out)).map_err(compress_err)?;
    drop(source);

    fs::remove_file(path).map_err(|source| ActionError::RemoveSource {
        path: path.to_path_buf(),
        archive: archive.clone(),
        source,
    })?;

    Ok(ActionOutcome::Compressed { archive })
}

fn gzip_stream(input: &mut File, out: &mut BufWriter<File>) -> io::Result<()> {
    let mut reader = BufReader::new(input);
    let mut encoder = GzEncoder::new(out, Compression::best());
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?.flush()
}

/// Remove the file at `path`.
pub fn delete_file(path: &Path) -> Result<ActionOutcome, ActionError> {
    fs::remove_file(path).map_err(|source| ActionError::Delete {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ActionOutcome::Deleted)
}
