//! Confdrift Binary
//!
//! Starts the differential watcher for a configuration directory and runs it
//! until interrupted.

use anyhow::Context;
use clap::Parser;
use confdrift::config::{ConfigLoader, ConfigOverrides};
use confdrift::logging::init_logging;
use confdrift::watch::WatchDaemon;
use std::path::PathBuf;
use std::process;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "confdrift", version, about = "Report configuration file edits as diffs")]
struct Cli {
    /// Configuration files directory (absolute path)
    #[arg(long)]
    dir: Option<String>,

    /// Collector endpoint receiving change records
    #[arg(long)]
    url: Option<String>,

    /// Plugin token sent with every change record (or set CONFDRIFT_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Allowed file extension; repeat for several (default: .cfg)
    #[arg(long = "ext")]
    extensions: Vec<String>,

    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let overrides = ConfigOverrides {
        root: cli.dir,
        endpoint: cli.url,
        token: cli.token,
        extensions: (!cli.extensions.is_empty()).then_some(cli.extensions),
    };
    let config = ConfigLoader::load(cli.config.as_deref(), &overrides)
        .context("Failed to load configuration")?;
    config.validate()?;
    init_logging(Some(&config.logging)).context("Failed to initialize logging")?;

    let daemon = WatchDaemon::from_config(&config, reqwest::Client::new())
        .context("Failed to initialize watcher")?;

    let shutdown = CancellationToken::new();
    let interrupt = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, shutting down");
                interrupt.cancel();
            }
            Err(e) => error!(error = %e, "Failed to listen for interrupt signal"),
        }
    });

    daemon.run(shutdown).await.context("Watcher failed")?;
    info!("Bye");
    Ok(())
}
