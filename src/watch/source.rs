//! Filesystem Event Source
//!
//! Subscribes to each directory of the watch set and hands every write
//! notification to a [`ChangeHandler`]. The loop multiplexes notification
//! events, notification errors and a cancellation token.

use super::events::write_paths;
use crate::error::{Result, WatchError};
use async_trait::async_trait;
use notify::{RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Receiver of write notifications.
#[async_trait]
pub trait ChangeHandler: Send + Sync {
    async fn handle_change(&self, path: &Path) -> Result<()>;
}

/// How handler invocations are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// One event fully handled before the next is taken.
    #[default]
    Sequential,
    /// One task per event. Same-path ordering is left to the handler.
    Concurrent,
}

/// Lifecycle of an event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Idle,
    Watching,
    Stopped,
}

pub struct EventSource {
    directories: Vec<PathBuf>,
    dispatch: DispatchMode,
    state: RwLock<WatcherState>,
}

impl EventSource {
    pub fn new(directories: Vec<PathBuf>) -> Self {
        Self {
            directories,
            dispatch: DispatchMode::default(),
            state: RwLock::new(WatcherState::Idle),
        }
    }

    pub fn with_dispatch(mut self, dispatch: DispatchMode) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    pub fn state(&self) -> WatcherState {
        *self.state.read()
    }

    /// Watch until `shutdown` is cancelled or the notification stream closes.
    ///
    /// Failing to subscribe any directory aborts before watching starts.
    /// Handlers already running when shutdown fires are awaited.
    pub async fn watch(
        &self,
        handler: Arc<dyn ChangeHandler>,
        shutdown: CancellationToken,
    ) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
                if tx.send(res).is_err() {
                    debug!("Dropping notification after shutdown");
                }
            })?;

        for directory in &self.directories {
            watcher
                .watch(directory, RecursiveMode::NonRecursive)
                .map_err(|source| WatchError::Subscribe {
                    path: directory.clone(),
                    source,
                })?;
        }

        *self.state.write() = WatcherState::Watching;
        info!(
            directories = self.directories.len(),
            dispatch = ?self.dispatch,
            "Watching directories"
        );

        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("Shutdown requested");
                    break;
                }
                message = rx.recv() => match message {
                    Some(Ok(event)) => {
                        for path in write_paths(event) {
                            self.dispatch_event(path, &handler, &mut in_flight).await;
                        }
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "Received an error from the notification queue");
                    }
                    None => {
                        error!("Notification channel closed");
                        break;
                    }
                },
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    log_join(joined);
                }
            }
        }

        for directory in &self.directories {
            if let Err(e) = watcher.unwatch(directory) {
                debug!(path = %directory.display(), error = %e, "Failed to release watch");
            }
        }
        drop(watcher);

        while let Some(joined) = in_flight.join_next().await {
            log_join(joined);
        }

        *self.state.write() = WatcherState::Stopped;
        info!("Watcher stopped");
        Ok(())
    }

    async fn dispatch_event(
        &self,
        path: PathBuf,
        handler: &Arc<dyn ChangeHandler>,
        in_flight: &mut JoinSet<()>,
    ) {
        match self.dispatch {
            DispatchMode::Sequential => run_handler(handler.as_ref(), &path).await,
            DispatchMode::Concurrent => {
                let handler = Arc::clone(handler);
                in_flight.spawn(async move { run_handler(handler.as_ref(), &path).await });
            }
        }
    }
}

async fn run_handler(handler: &dyn ChangeHandler, path: &Path) {
    if let Err(e) = handler.handle_change(path).await {
        warn!(path = %path.display(), error = %e, "Change handler failed");
    }
}

fn log_join(joined: std::result::Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        error!(error = %e, "Change handler task aborted");
    }
}
