//! Integration tests for the differential watcher

mod engine_http;
mod event_source;
mod inventory_scan;
