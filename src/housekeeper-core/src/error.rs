//! Error types for housekeeper-core.
//!
//! Errors are recovered at the narrowest scope that can continue:
//! [`StatError`] and [`ActionError`] stay with a single file, [`WalkError`]
//! with a single folder, and only [`ConfigError`] aborts a run.

use std::io;
use std::path::{Path, PathBuf};

use housekeeper_utils_file_safety::FileSafetyError;
use thiserror::Error;

/// The configuration document could not be loaded. Fatal for the run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("Configuration file '{}' not found", .0.display())]
    NotFound(PathBuf),

    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid JSON or does not match the schema.
    #[error("Configuration file '{}' is not valid: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A file's metadata could not be read, e.g. it vanished after listing.
#[derive(Debug, Error)]
#[error("Unable to get the age of file '{}': {source}", .path.display())]
pub struct StatError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// A terminal action failed for one file. Never partially applied.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The target is no longer a regular file.
    #[error("Refusing to act on '{}': {source}", .path.display())]
    NotRegular {
        path: PathBuf,
        #[source]
        source: FileSafetyError,
    },

    /// Writing the archive failed; the source file is untouched.
    #[error("Unable to gzip file '{}': {source}", .path.display())]
    Compress {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The archive is complete but the source could not be removed.
    #[error(
        "Gzipped '{}' to '{}' but could not remove the original: {source}",
        .path.display(),
        .archive.display()
    )]
    RemoveSource {
        path: PathBuf,
        archive: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Removing the file failed.
    #[error("Unable to delete file '{}': {source}", .path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ActionError {
    /// The file the action was applied to.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotRegular { path, .. }
            | Self::Compress { path, .. }
            | Self::RemoveSource { path, .. }
            | Self::Delete { path, .. } => path,
        }
    }
}

/// Anything that can go wrong while processing a single file.
#[derive(Debug, Error)]
pub enum FileError {
    #[error(transparent)]
    Stat(#[from] StatError),

    #[error(transparent)]
    Action(#[from] ActionError),
}

/// A configured folder could not be enumerated. Fatal for that folder only.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The configured path does not exist.
    #[error("Folder '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    /// The configured path exists but is not a directory.
    #[error("Folder '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// The folder exists but could not be read.
    #[error("Folder '{}' could not be read: {source}", .path.display())]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WalkError {
    /// The configured folder that failed.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(path) | Self::NotADirectory(path) => path,
            Self::Inaccessible { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_path() {
        let err = WalkError::NotFound(PathBuf::from("/srv/missing"));
        assert_eq!(err.to_string(), "Folder '/srv/missing' does not exist");
        assert_eq!(err.path(), Path::new("/srv/missing"));

        let err = ActionError::Delete {
            path: PathBuf::from("/srv/a.log"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().starts_with("Unable to delete file '/srv/a.log'"));
        assert_eq!(err.path(), Path::new("/srv/a.log"));
    }

    #[test]
    fn test_file_error_is_transparent() {
        let stat = StatError {
            path: PathBuf::from("gone.txt"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        let expected = stat.to_string();
        let err = FileError::from(stat);
        assert_eq!(err.to_string(), expected);
    }
}
