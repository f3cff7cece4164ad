//! Folder policies: what to do, where, to which files.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::aging::AgeThreshold;
use crate::matcher::ExtensionFilter;

/// Terminal action applied to a qualifying file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Replace the file with a gzip archive of itself.
    #[serde(alias = "gzip")]
    Compress,
    /// Remove the file.
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Compress => "compress",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One monitored folder with its filter, threshold, and action.
///
/// The folder's existence is not checked here; the walker reports a missing
/// folder when it gets to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderPolicy {
    pub path: PathBuf,
    pub extensions: ExtensionFilter,
    pub age_threshold: AgeThreshold,
    pub action: Action,
}

impl FolderPolicy {
    pub fn new(
        path: impl Into<PathBuf>,
        extensions: ExtensionFilter,
        age_threshold: AgeThreshold,
        action: Action,
    ) -> Self {
        Self {
            path: path.into(),
            extensions,
            age_threshold,
            action,
        }
    }
}
