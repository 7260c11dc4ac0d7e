//! Watcher configuration: schema, defaults and validation.

mod loader;

pub use loader::{ConfigLoader, ConfigOverrides};

use crate::engine::{EngineConfig, SettleStrategy, DEFAULT_MAX_FILE_SIZE};
use crate::error::WatchError;
use crate::extensions::AllowedExtensions;
use crate::logging::LoggingConfig;
use crate::watch::DispatchMode;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

fn default_extensions() -> Vec<String> {
    vec![".cfg".to_string()]
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

/// Top-level configuration for the watcher daemon.
#[derive(Clone, Deserialize)]
pub struct WatcherConfig {
    /// Absolute path of the directory tree to watch
    #[serde(default)]
    pub root: PathBuf,

    /// Extension allow-list, dotted or bare
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Collector endpoint receiving change records
    #[serde(default)]
    pub endpoint: String,

    /// Shared token sent in the plugin token header
    #[serde(default)]
    pub token: String,

    /// Files above this many bytes are never diffed
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    #[serde(default)]
    pub settle: SettleStrategy,

    #[serde(default)]
    pub dispatch: DispatchMode,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WatcherConfig {
    /// Check values that deserialization cannot.
    pub fn validate(&self) -> Result<(), WatchError> {
        if !self.root.is_absolute() {
            return Err(WatchError::Config(format!(
                "root must be an absolute path, like /usr/local/nagios/etc/ (got {:?})",
                self.root
            )));
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(WatchError::Config(format!(
                "endpoint must be an http:// or https:// URL (got {:?})",
                self.endpoint
            )));
        }
        if self.max_file_size == 0 {
            return Err(WatchError::Config(
                "max_file_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn allowed_extensions(&self) -> AllowedExtensions {
        AllowedExtensions::new(&self.extensions)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_file_size: self.max_file_size,
            settle: self.settle,
        }
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            extensions: default_extensions(),
            endpoint: String::new(),
            token: String::new(),
            max_file_size: default_max_file_size(),
            settle: SettleStrategy::default(),
            dispatch: DispatchMode::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// The token stays out of logs and error reports.
impl fmt::Debug for WatcherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatcherConfig")
            .field("root", &self.root)
            .field("extensions", &self.extensions)
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .field("max_file_size", &self.max_file_size)
            .field("settle", &self.settle)
            .field("dispatch", &self.dispatch)
            .field("logging", &self.logging)
            .finish()
    }
}
