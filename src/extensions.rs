//! Extension allow-list shared by inventory and event handling.

use std::collections::BTreeSet;
use std::path::Path;

/// Immutable set of file suffixes eligible for watching.
///
/// Entries are stored without the leading dot, so `".cfg"` and `"cfg"` name
/// the same suffix. An empty set admits nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedExtensions {
    suffixes: BTreeSet<String>,
}

impl AllowedExtensions {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let suffixes = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        Self { suffixes }
    }

    /// Whether `path` carries an allowed extension.
    pub fn allows(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.suffixes.contains(ext))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.suffixes.len()
    }

    /// Suffixes in dotted form, sorted.
    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        self.suffixes.iter().map(|s| format!(".{}", s))
    }
}
