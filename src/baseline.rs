//! Baseline Store
//!
//! In-memory map from path to the last accepted checksum and content. Records
//! are created at startup (or on the first accepted change for an unknown
//! path), overwritten after each accepted change, and never removed.

use crate::error::{Result, WatchError};
use crate::types::{Checksum, FileRecord};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of seeding the store from an inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub recorded: usize,
    pub oversized: Vec<PathBuf>,
}

/// Concurrency-safe baseline store
#[derive(Default)]
pub struct BaselineStore {
    records: RwLock<HashMap<PathBuf, FileRecord>>,
}

impl BaselineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every inventoried file at or under `max_file_size` into the store.
    ///
    /// Oversized files are skipped. Any stat or read failure aborts startup.
    pub fn seed(&self, files: &[PathBuf], max_file_size: u64) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        for path in files {
            let metadata = std::fs::metadata(path).map_err(|e| WatchError::io(path, e))?;
            if metadata.len() > max_file_size {
                info!(
                    path = %path.display(),
                    size = metadata.len(),
                    max_file_size,
                    "Skipping oversized file at startup"
                );
                report.oversized.push(path.clone());
                continue;
            }

            let content = std::fs::read(path).map_err(|e| WatchError::io(path, e))?;
            let record = FileRecord::new(path.clone(), content);
            debug!(
                path = %path.display(),
                checksum = %hex::encode(record.checksum),
                "Seeded baseline"
            );
            self.put(record);
            report.recorded += 1;
        }

        Ok(report)
    }

    pub fn get(&self, path: &Path) -> Option<FileRecord> {
        self.records.read().get(path).cloned()
    }

    pub fn checksum(&self, path: &Path) -> Option<Checksum> {
        self.records.read().get(path).map(|r| r.checksum)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.records.read().contains_key(path)
    }

    /// Insert or overwrite the record for its path.
    pub fn put(&self, record: FileRecord) {
        self.records.write().insert(record.path.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
