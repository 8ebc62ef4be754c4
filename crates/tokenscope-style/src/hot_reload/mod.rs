//! Reload sheets when their files change on disk.
//!
//! This module is only available with the `hot-reload` feature.

mod watcher;

pub use watcher::{ChangeKind, SheetChangeEvent, SheetWatcher};
