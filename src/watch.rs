//! Watch runtime: event classification, event source, and daemon.

mod events;
mod runtime;
mod source;

pub use events::{is_write, write_paths};
pub use runtime::WatchDaemon;
pub use source::{ChangeHandler, DispatchMode, EventSource, WatcherState};
