//! Watch daemon: startup wiring and the long-running watch.

use super::source::{EventSource, WatcherState};
use crate::baseline::BaselineStore;
use crate::config::WatcherConfig;
use crate::engine::DifferentialEngine;
use crate::error::{Result, WatchError};
use crate::inventory::{self, Inventory};
use crate::transmit::{DiffTransmitter, HttpTransmitter};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Watch mode daemon
///
/// Construction performs the one-time inventory and baseline seeding; any
/// failure there is fatal and no watch is started.
pub struct WatchDaemon {
    inventory: Inventory,
    engine: Arc<DifferentialEngine>,
    source: EventSource,
}

impl WatchDaemon {
    /// Build a daemon that posts changes to the configured endpoint.
    pub fn from_config(config: &WatcherConfig, client: reqwest::Client) -> Result<Self> {
        let transmitter = HttpTransmitter::new(client, &config.endpoint, &config.token);
        Self::with_transmitter(config, Arc::new(transmitter))
    }

    /// Build a daemon around any transmitter.
    pub fn with_transmitter(
        config: &WatcherConfig,
        transmitter: Arc<dyn DiffTransmitter>,
    ) -> Result<Self> {
        let root =
            dunce::canonicalize(&config.root).map_err(|e| WatchError::io(&config.root, e))?;
        let allowed = Arc::new(config.allowed_extensions());

        info!(
            root = %root.display(),
            extensions = ?allowed.iter().collect::<Vec<_>>(),
            "Building inventory"
        );
        let inventory = inventory::scan(&root, &allowed)?;

        let baseline = Arc::new(BaselineStore::new());
        let report = baseline.seed(&inventory.files, config.max_file_size)?;

        info!(
            files = inventory.files.len(),
            directories = inventory.directories.len(),
            recorded = report.recorded,
            oversized = report.oversized.len(),
            "Initialized differential watcher"
        );

        let engine = Arc::new(DifferentialEngine::new(
            allowed,
            baseline,
            transmitter,
            config.engine_config(),
        ));
        let source =
            EventSource::new(inventory.directories.clone()).with_dispatch(config.dispatch);

        Ok(Self {
            inventory,
            engine,
            source,
        })
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn engine(&self) -> &Arc<DifferentialEngine> {
        &self.engine
    }

    pub fn state(&self) -> WatcherState {
        self.source.state()
    }

    /// Watch until `shutdown` is cancelled.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<()> {
        let handler = Arc::clone(&self.engine);
        self.source.watch(handler, shutdown).await
    }
}
