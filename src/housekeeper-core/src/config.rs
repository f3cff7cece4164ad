//! Configuration document loading.
//!
//! ```json
//! {
//!   "folders": [
//!     {
//!       "path": "/var/log/app",
//!       "extensions": [".log", ".txt"],
//!       "age_limit": { "days": 7 },
//!       "action": "gzip"
//!     },
//!     {
//!       "path": "/var/log/app",
//!       "extension": ".gz",
//!       "age_limit": { "days": 30, "hours": 12 },
//!       "action": "delete"
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::aging::AgeThreshold;
use crate::error::ConfigError;
use crate::matcher::ExtensionFilter;
use crate::policy::{Action, FolderPolicy};

/// Top-level configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HousekeepingConfig {
    /// Folders to process, in order.
    pub folders: Vec<FolderConfig>,
}

/// One entry of the `folders` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderConfig {
    /// Directory to walk recursively.
    pub path: PathBuf,
    /// Extension allow-list; `extension` is accepted as an alias.
    #[serde(default, alias = "extension")]
    pub extensions: ExtensionList,
    /// Minimum age before a file is acted on.
    #[serde(default)]
    pub age_limit: AgeThreshold,
    /// `gzip`/`compress` or `delete`.
    pub action: Action,
}

/// Extensions given either as a single string or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtensionList {
    One(String),
    Many(Vec<String>),
}

impl Default for ExtensionList {
    fn default() -> Self {
        ExtensionList::Many(Vec::new())
    }
}

impl ExtensionList {
    /// Build the matcher for this list.
    pub fn to_filter(&self) -> ExtensionFilter {
        match self {
            ExtensionList::One(ext) => std::iter::once(ext.as_str()).collect(),
            ExtensionList::Many(exts) => exts.iter().map(String::as_str).collect(),
        }
    }
}

impl FolderConfig {
    /// Immutable policy for this entry.
    pub fn to_policy(&self) -> FolderPolicy {
        FolderPolicy::new(
            self.path.clone(),
            self.extensions.to_filter(),
            self.age_limit,
            self.action,
        )
    }
}

impl HousekeepingConfig {
    /// Load and parse the configuration document at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Policies in document order.
    pub fn policies(&self) -> Vec<FolderPolicy> {
        self.folders.iter().map(FolderConfig::to_policy).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("HousekeepingFilesFolders.json");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_full_document() {
        let (_dir, path) = write_config(
            r#"{
                "folders": [
                    {
                        "path": "/var/log/app",
                        "extensions": [".log", ".txt"],
                        "age_limit": {"days": 7, "hours": 1, "minutes": 30},
                        "action": "gzip"
                    },
                    {
                        "path": "/tmp/scratch",
                        "action": "delete"
                    }
                ]
            }"#,
        );

        let policies = HousekeepingConfig::load(&path).unwrap().policies();
        assert_eq!(
            policies,
            vec![
                FolderPolicy::new(
                    "/var/log/app",
                    [".log", ".txt"].into_iter().collect(),
                    AgeThreshold::new(7, 1, 30),
                    Action::Compress,
                ),
                FolderPolicy::new(
                    "/tmp/scratch",
                    ExtensionFilter::any(),
                    AgeThreshold::default(),
                    Action::Delete,
                ),
            ]
        );
    }

    #[test]
    fn test_single_extension_alias() {
        let (_dir, path) = write_config(
            r#"{"folders": [{"path": "/data", "extension": ".csv",
                "age_limit": {"minutes": 5}, "action": "compress"}]}"#,
        );

        let policies = HousekeepingConfig::load(&path).unwrap().policies();
        assert_eq!(policies[0].extensions.iter().collect::<Vec<_>>(), vec![".csv"]);
        assert_eq!(policies[0].age_threshold, AgeThreshold::new(0, 0, 5));
    }

    #[test]
    fn test_empty_single_extension_matches_all() {
        let (_dir, path) = write_config(
            r#"{"folders": [{"path": "/data", "extension": "", "action": "delete"}]}"#,
        );

        let policies = HousekeepingConfig::load(&path).unwrap().policies();
        assert!(policies[0].extensions.is_empty());
    }

    #[test]
    fn test_empty_folder_list() {
        let (_dir, path) = write_config(r#"{"folders": []}"#);
        assert!(HousekeepingConfig::load(&path).unwrap().policies().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = HousekeepingConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_malformed_json() {
        let (_dir, path) = write_config("{ folders: [");
        let err = HousekeepingConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("is not valid"));
    }

    #[test]
    fn test_missing_folders_key() {
        let (_dir, path) = write_config(r#"{"paths": []}"#);
        assert!(matches!(
            HousekeepingConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_unknown_action_is_fatal() {
        let (_dir, path) =
            write_config(r#"{"folders": [{"path": "/data", "action": "shred"}]}"#);
        assert!(matches!(
            HousekeepingConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_negative_age_is_fatal() {
        let (_dir, path) = write_config(
            r#"{"folders": [{"path": "/data", "age_limit": {"days": -2}, "action": "delete"}]}"#,
        );
        assert!(matches!(
            HousekeepingConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_directory_instead_of_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = HousekeepingConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
