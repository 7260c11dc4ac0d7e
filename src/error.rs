//! Error types for the differential watcher.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, WatchError>;

/// Errors raised by inventory, watching, diffing and transmission.
#[derive(Error, Debug)]
pub enum WatchError {
    /// Directory traversal failed; the inventory is discarded.
    #[error("inventory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// Filesystem access for a specific path failed.
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The notification backend could not be created or subscribed.
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    /// Subscribing a directory failed.
    #[error("failed to watch {path}: {source}")]
    Subscribe {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// Transport-level failure talking to the collector.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Collector answered with a non-2xx status.
    #[error("collector returned non-2xx status code ({0})")]
    Status(u16),

    /// A diff could not be parsed back into a patch.
    #[error("malformed diff: {0}")]
    MalformedDiff(String),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),
}

impl WatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WatchError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error came from delivering a change record.
    pub fn is_transmission(&self) -> bool {
        matches!(
            self,
            WatchError::Transport(_) | WatchError::Status(_)
        )
    }
}

impl From<config::ConfigError> for WatchError {
    fn from(err: config::ConfigError) -> Self {
        WatchError::Config(err.to_string())
    }
}
