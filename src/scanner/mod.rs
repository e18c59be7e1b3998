//! Upstream change detection.
//!
//! Watches the local media folders and produces the scan events the Jellyfin
//! target consumes.

pub mod watcher;

pub use watcher::{FileWatcher, WatchError};
