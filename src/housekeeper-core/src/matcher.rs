//! Extension matching against a folder's allow-list.

use std::collections::BTreeSet;
use std::ffi::OsStr;

/// Extension of a file name, including the leading `.`.
///
/// Splits at the last `.` of the name. Leading dots are part of the stem, so
/// `.bashrc` has no extension while `archive.tar.gz` has `.gz`. Returns the
/// empty string when there is no extension.
pub fn file_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if file_name[..idx].trim_start_matches('.').is_empty() => "",
        Some(idx) => &file_name[idx..],
        None => "",
    }
}

/// Set of extensions a folder policy applies to. Empty means "any file".
///
/// Entries are compared exactly and case-sensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: BTreeSet<String>,
}

impl ExtensionFilter {
    /// A filter that matches every file.
    pub fn any() -> Self {
        Self::default()
    }

    /// Whether the filter matches every file.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Iterate the configured extensions in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    /// Check whether a file name passes the filter.
    pub fn matches(&self, file_name: &OsStr) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let name = file_name.to_string_lossy();
        self.extensions.contains(file_extension(&name))
    }

    /// Entries that can never match because they lack a leading `.`.
    pub fn unreachable_entries(&self) -> Vec<&str> {
        self.iter().filter(|ext| !ext.starts_with('.')).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ExtensionFilter {
    /// Empty strings are dropped, so `[""]` behaves like no filter at all.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            extensions: iter
                .into_iter()
                .map(Into::into)
                .filter(|ext: &String| !ext.is_empty())
                .collect(),
        }
    }
}
