//! Core types for the differential watcher.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Checksum: BLAKE3 digest of a file's full content
pub type Checksum = [u8; 32];

/// Compute the checksum of a content snapshot.
pub fn checksum(content: &[u8]) -> Checksum {
    *blake3::hash(content).as_bytes()
}

/// Last accepted state of a watched file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub checksum: Checksum,
    pub snapshot: Vec<u8>,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>, snapshot: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            checksum: checksum(&snapshot),
            snapshot,
        }
    }
}

/// Payload delivered to the collector for one detected change.
///
/// Field names are capitalized on the wire; the receiving webhook decodes
/// `Name` and `Diff`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Diff")]
    pub diff: String,
}

impl ChangeRecord {
    /// Build a record named after the base filename of `path`.
    pub fn for_path(path: &Path, diff: String) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { name, diff }
    }
}
