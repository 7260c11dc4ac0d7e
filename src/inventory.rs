//! Inventory Builder
//!
//! One-time recursive scan of the watched root. The resulting file list seeds
//! the baseline store and the directory list becomes the watch set.

use crate::error::Result;
use crate::extensions::AllowedExtensions;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Files and directories found under a root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub files: Vec<PathBuf>,
    pub directories: Vec<PathBuf>,
}

/// Walk `root` and split its entries into allowed files and all directories.
///
/// The root itself is reported as a directory. Symlinks are not followed, so
/// a dangling link is only picked up when its name is allowed (and then fails
/// when the baseline reads it). The first traversal error aborts the scan.
pub fn scan(root: &Path, allowed: &AllowedExtensions) -> Result<Inventory> {
    let mut inventory = Inventory::default();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            inventory.directories.push(entry.into_path());
        } else if allowed.allows(entry.path()) {
            inventory.files.push(entry.into_path());
        }
    }

    debug!(
        root = %root.display(),
        files = inventory.files.len(),
        directories = inventory.directories.len(),
        "Inventory scan complete"
    );
    Ok(inventory)
}
