//! Per-path mutual exclusion for change handling
//!
//! The compare-then-update sequence of the differential engine must be atomic
//! with respect to a single path. Distinct paths never block each other.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-path lock manager
///
/// Locks are created on first use and kept for the life of the process,
/// matching the lifetime of baseline records.
pub struct PathLockManager {
    locks: RwLock<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl PathLockManager {
    pub fn new() -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
        }
    }

    fn get_path_lock(&self, path: &Path) -> Arc<Mutex<()>> {
        {
            let map = self.locks.read();
            if let Some(lock) = map.get(path) {
                return lock.clone();
            }
        }

        // Double-check under the write lock; another task may have inserted it.
        let mut map = self.locks.write();
        map.entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Wait for exclusive access to `path`.
    pub async fn acquire(&self, path: &Path) -> OwnedMutexGuard<()> {
        self.get_path_lock(path).lock_owned().await
    }

    /// Number of paths that have been locked at least once.
    pub fn tracked(&self) -> usize {
        self.locks.read().len()
    }
}

impl Default for PathLockManager {
    fn default() -> Self {
        Self::new()
    }
}
