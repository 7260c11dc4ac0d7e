//! Classification of raw notification events.

use notify::event::ModifyKind;
use notify::{Event, EventKind};
use std::path::PathBuf;

/// Whether the event reports a content write.
///
/// Create, remove, rename, metadata and access events are not writes.
pub fn is_write(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any)
    )
}

/// Paths touched by a write event, or nothing for any other kind.
pub fn write_paths(event: Event) -> Vec<PathBuf> {
    if is_write(&event.kind) {
        event.paths
    } else {
        Vec::new()
    }
}
