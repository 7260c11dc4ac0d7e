//! Differential Engine
//!
//! Turns a write notification into at most one change record. For each path
//! the engine re-reads the file, compares its checksum against the baseline,
//! diffs against the stored snapshot, hands the diff to the transmitter and
//! advances the baseline whether or not delivery succeeded.

use crate::baseline::BaselineStore;
use crate::concurrency::PathLockManager;
use crate::diff::compute_diff;
use crate::error::{Result, WatchError};
use crate::extensions::AllowedExtensions;
use crate::transmit::DiffTransmitter;
use crate::types::{checksum, ChangeRecord, Checksum, FileRecord};
use crate::watch::ChangeHandler;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Files larger than this are never read or diffed.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024;

/// How long to let a write land on disk before reading it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SettleStrategy {
    /// Sleep once before reading.
    FixedDelay { delay_ms: u64 },
    /// Re-hash every `interval_ms` until two consecutive reads match, giving
    /// up after `max_reads` reads.
    UntilStable { interval_ms: u64, max_reads: usize },
}

impl Default for SettleStrategy {
    fn default() -> Self {
        SettleStrategy::FixedDelay { delay_ms: 1 }
    }
}

/// Engine tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub max_file_size: u64,
    pub settle: SettleStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            settle: SettleStrategy::default(),
        }
    }
}

/// What happened to a single write notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Extension not on the allow-list.
    Ignored,
    /// File above the size threshold; baseline untouched.
    Oversized { size: u64 },
    /// Content identical to the baseline.
    Unchanged,
    /// Diff delivered and baseline advanced.
    Sent(ChangeRecord),
}

pub struct DifferentialEngine {
    allowed: Arc<AllowedExtensions>,
    baseline: Arc<BaselineStore>,
    transmitter: Arc<dyn DiffTransmitter>,
    locks: PathLockManager,
    config: EngineConfig,
}

impl DifferentialEngine {
    pub fn new(
        allowed: Arc<AllowedExtensions>,
        baseline: Arc<BaselineStore>,
        transmitter: Arc<dyn DiffTransmitter>,
        config: EngineConfig,
    ) -> Self {
        Self {
            allowed,
            baseline,
            transmitter,
            locks: PathLockManager::new(),
            config,
        }
    }

    pub fn baseline(&self) -> &Arc<BaselineStore> {
        &self.baseline
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process one write notification for `path`.
    ///
    /// Stat and read failures leave the baseline untouched. A delivery
    /// failure is returned only after the baseline has advanced.
    pub async fn process(&self, path: &Path) -> Result<ChangeOutcome> {
        if !self.allowed.allows(path) {
            return Ok(ChangeOutcome::Ignored);
        }

        let _guard = self.locks.acquire(path).await;

        self.settle(path).await;

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| WatchError::io(path, e))?;
        if metadata.len() > self.config.max_file_size {
            info!(
                path = %path.display(),
                size = metadata.len(),
                max_file_size = self.config.max_file_size,
                "File exceeds size threshold, skipping comparison"
            );
            return Ok(ChangeOutcome::Oversized {
                size: metadata.len(),
            });
        }

        let contents = tokio::fs::read(path)
            .await
            .map_err(|e| WatchError::io(path, e))?;
        let new_checksum = checksum(&contents);

        let previous = self.baseline.get(path);
        if previous.as_ref().map(|r| r.checksum) == Some(new_checksum) {
            debug!(path = %path.display(), "Write event without content change");
            return Ok(ChangeOutcome::Unchanged);
        }

        let previous_snapshot = previous.map(|r| r.snapshot).unwrap_or_default();
        let change = ChangeRecord::for_path(path, compute_diff(&previous_snapshot, &contents));

        let delivery = self.transmitter.send(&change).await;

        self.baseline.put(FileRecord {
            path: path.to_path_buf(),
            checksum: new_checksum,
            snapshot: contents,
        });
        debug!(
            path = %path.display(),
            checksum = %hex::encode(new_checksum),
            "Baseline advanced"
        );

        delivery?;
        info!(
            path = %path.display(),
            diff_size = change.diff.len(),
            "Sent the diff"
        );
        Ok(ChangeOutcome::Sent(change))
    }

    async fn settle(&self, path: &Path) {
        match self.config.settle {
            SettleStrategy::FixedDelay { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
            SettleStrategy::UntilStable {
                interval_ms,
                max_reads,
            } => {
                let interval = Duration::from_millis(interval_ms);
                let mut last: Option<Checksum> = None;
                for _ in 0..max_reads.max(2) {
                    tokio::time::sleep(interval).await;
                    // Errors and oversize are reported by the caller's own stat.
                    let Some(current) = self.peek_checksum(path).await else {
                        return;
                    };
                    if last == Some(current) {
                        return;
                    }
                    last = Some(current);
                }
                debug!(path = %path.display(), "File still changing after settle reads");
            }
        }
    }

    async fn peek_checksum(&self, path: &Path) -> Option<Checksum> {
        let metadata = tokio::fs::metadata(path).await.ok()?;
        if metadata.len() > self.config.max_file_size {
            return None;
        }
        tokio::fs::read(path).await.ok().map(|c| checksum(&c))
    }
}

#[async_trait]
impl ChangeHandler for DifferentialEngine {
    async fn handle_change(&self, path: &Path) -> Result<()> {
        self.process(path).await.map(|_| ())
    }
}
