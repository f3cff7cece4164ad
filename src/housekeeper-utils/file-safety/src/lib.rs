//! File safety utilities for Housekeeper.
//!
//! This module provides the two filesystem primitives the housekeeping
//! actions rely on:
//! - Refusing to act on anything that is not a plain regular file
//!   (directories, symlinks, block/character devices, FIFOs, sockets)
//! - Writing a new file next to an existing one without ever exposing a
//!   partially written result under the final name

use std::fs::{self, File, Metadata, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Infix placed between the target name and the process id of a temp file.
pub const TEMP_INFIX: &str = ".tmp.";

/// Longest file name component, in bytes, accepted by common filesystems.
pub const NAME_MAX: usize = 255;

/// Errors that can occur while validating an action target.
#[derive(Debug, thiserror::Error)]
pub enum FileSafetyError {
    /// Target is a directory.
    #[error("Not a regular file (directory): {0}")]
    Directory(PathBuf),

    /// Target is a symbolic link.
    #[error("Not a regular file (symlink): {0}")]
    Symlink(PathBuf),

    /// Target is a block device.
    #[error("Not a regular file (block device): {0}")]
    BlockDevice(PathBuf),

    /// Target is a character device.
    #[error("Not a regular file (character device): {0}")]
    CharDevice(PathBuf),

    /// Target is a FIFO (named pipe).
    #[error("Not a regular file (FIFO/named pipe): {0}")]
    Fifo(PathBuf),

    /// Target is a socket.
    #[error("Not a regular file (socket): {0}")]
    Socket(PathBuf),

    /// IO error during validation.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Validate that `path` names a regular file, without following symlinks.
///
/// Returns the file's metadata so callers do not need to stat it twice.
///
/// # Examples
///
/// ```no_run
/// use housekeeper_utils_file_safety::ensure_regular_file;
/// use std::path::Path;
///
/// let metadata = ensure_regular_file(Path::new("Cargo.toml")).unwrap();
/// assert!(metadata.is_file());
///
/// #[cfg(unix)]
/// assert!(ensure_regular_file(Path::new("/dev/null")).is_err());
/// ```
pub fn ensure_regular_file(path: &Path) -> Result<Metadata, FileSafetyError> {
    let metadata = fs::symlink_metadata(path)?;
    let file_type = metadata.file_type();

    if file_type.is_file() {
        return Ok(metadata);
    }
    if file_type.is_dir() {
        return Err(FileSafetyError::Directory(path.to_path_buf()));
    }
    if file_type.is_symlink() {
        return Err(FileSafetyError::Symlink(path.to_path_buf()));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;

        if file_type.is_block_device() {
            return Err(FileSafetyError::BlockDevice(path.to_path_buf()));
        }
        if file_type.is_char_device() {
            return Err(FileSafetyError::CharDevice(path.to_path_buf()));
        }
        if file_type.is_fifo() {
            return Err(FileSafetyError::Fifo(path.to_path_buf()));
        }
        if file_type.is_socket() {
            return Err(FileSafetyError::Socket(path.to_path_buf()));
        }
    }

    Err(FileSafetyError::Io(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("unsupported file type: {}", path.display()),
    )))
}

/// Hidden sibling used as the staging file for a write to `path`.
///
/// The name is `.<file name>.tmp.<pid>` in the same directory, so the final
/// rename never crosses a filesystem boundary. The borrowed file name is
/// shortened as needed to keep the whole name within [`NAME_MAX`] bytes.
pub fn temp_sibling(path: &Path) -> io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("path has no file name: {}", path.display()),
        )
    })?;
    let parent = path.parent().unwrap_or(Path::new("."));

    let suffix = format!("{}{}", TEMP_INFIX, std::process::id());
    let name = file_name.to_string_lossy();
    let stem = truncate_at_char_boundary(&name, NAME_MAX - 1 - suffix.len());

    Ok(parent.join(format!(".{}{}", stem, suffix)))
}

fn truncate_at_char_boundary(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Create `path` atomically from whatever `write` produces.
///
/// This works by:
/// 1. Streaming into a hidden temporary sibling of `path`
/// 2. Flushing and syncing the temporary file to disk (fsync)
/// 3. Renaming the temporary file onto `path`
///
/// If `write` or any step before the rename fails, the temporary file is
/// removed and `path` is left exactly as it was. An existing file at `path`
/// is replaced.
///
/// # Examples
///
/// ```no_run
/// use housekeeper_utils_file_safety::write_atomically;
/// use std::io::Write;
/// use std::path::Path;
///
/// write_atomically(Path::new("report.txt"), |out| out.write_all(b"done\n")).unwrap();
/// ```
pub fn write_atomically<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let temp_path = temp_sibling(path)?;

    if let Err(e) = stage(&temp_path, write) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    // Persist the directory entry as well
    #[cfg(unix)]
    {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}

fn stage<F>(temp_path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(temp_path)?;
    let mut writer = BufWriter::new(file);

    write(&mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leftover_temp_files(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .expect("Failed to read dir")
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(TEMP_INFIX))
            .map(|e| e.path())
            .collect()
    }

    #[test]
    fn test_regular_file_is_accepted() {
        let temp = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let metadata = ensure_regular_file(temp.path()).expect("regular file");
        assert!(metadata.is_file());
    }

    #[test]
    fn test_missing_file_returns_io_error() {
        let result = ensure_regular_file(Path::new("/nonexistent/path/to/file.txt"));
        assert!(matches!(result, Err(FileSafetyError::Io(_))));
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let result = ensure_regular_file(dir.path());
        assert!(matches!(result, Err(FileSafetyError::Directory(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_rejected() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let target = dir.path().join("target.txt");
        fs::write(&target, "data").expect("Failed to write");
        let link = dir.path().join("link.txt");
        std::os::unix::fs::symlink(&target, &link).expect("Failed to symlink");

        let result = ensure_regular_file(&link);
        assert!(matches!(result, Err(FileSafetyError::Symlink(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_dev_null_is_rejected() {
        let result = ensure_regular_file(Path::new("/dev/null"));
        assert!(matches!(result, Err(FileSafetyError::CharDevice(_))));
    }

    #[test]
    fn test_temp_sibling_is_hidden_and_adjacent() {
        let temp = temp_sibling(Path::new("/var/log/app/a.log.gz")).unwrap();
        assert_eq!(temp.parent(), Some(Path::new("/var/log/app")));
        let name = temp.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".a.log.gz.tmp."));
    }

    #[test]
    fn test_temp_sibling_of_long_name_fits_name_max() {
        let long = format!("{}.log.gz", "a".repeat(241));
        let temp = temp_sibling(&Path::new("/var/log/app").join(&long)).unwrap();
        let name = temp.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.len() <= NAME_MAX);
        assert!(name.starts_with(".aaaa"));
        assert!(name.contains(TEMP_INFIX));
    }

    #[test]
    fn test_temp_sibling_truncates_on_char_boundary() {
        let long = "é".repeat(200);
        let temp = temp_sibling(Path::new(&long)).unwrap();
        let name = temp.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.len() <= NAME_MAX);
        assert!(!name.contains('\u{FFFD}'));
    }

    #[test]
    fn test_write_atomically_long_target_name() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join(format!("{}.log.gz", "a".repeat(241)));

        write_atomically(&file_path, |out| out.write_all(b"archived")).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "archived");
        assert!(leftover_temp_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_write_atomically_creates_file() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("out.txt");

        write_atomically(&file_path, |out| out.write_all(b"new content")).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");
        assert!(leftover_temp_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_write_atomically_replaces_existing() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("existing.txt");
        fs::write(&file_path, "old content").expect("Failed to write");

        write_atomically(&file_path, |out| out.write_all(b"new content")).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");
    }

    #[test]
    fn test_failed_write_leaves_nothing_behind() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("never.txt");

        let result = write_atomically(&file_path, |out| {
            out.write_all(b"partial")?;
            Err(io::Error::other("disk full"))
        });

        assert!(result.is_err());
        assert!(!file_path.exists());
        assert!(leftover_temp_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_failed_write_keeps_previous_content() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("kept.txt");
        fs::write(&file_path, "previous").expect("Failed to write");

        let result = write_atomically(&file_path, |_| Err(io::Error::other("boom")));

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "previous");
    }

    #[test]
    fn test_missing_parent_directory_fails() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("missing").join("out.txt");

        let result = write_atomically(&file_path, |out| out.write_all(b"x"));
        assert!(result.is_err());
    }
}
