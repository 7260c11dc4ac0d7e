//! Confdrift: Differential Configuration Watcher
//!
//! Watches a tree of monitoring-configuration files and reports every
//! content edit to a remote collector as a unified diff. Baselines live in
//! memory only; delivery is at-most-once.

pub mod baseline;
pub mod concurrency;
pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod extensions;
pub mod inventory;
pub mod logging;
pub mod transmit;
pub mod types;
pub mod watch;
