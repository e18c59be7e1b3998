//! File system watcher that turns changes into scan events.
//!
//! Uses the `notify` crate to watch directories and reports the folders in
//! which something changed, one [`ScanEvent`] per folder.
//!
//! # Design
//!
//! - **Debounced events**: a burst of changes coalesces into one batch
//! - **Folder granularity**: a file change reports its parent directory, a new
//!   directory reports itself; duplicates within a batch are collapsed
//! - **Non-blocking**: events arrive on a bounded channel
//! - **Graceful shutdown**: dropping the handle stops watching
//!
//! # Usage
//!
//! ```rust,ignore
//! let (watcher, rx) = FileWatcher::new(vec!["/mnt/media".into()], Duration::from_millis(500))?;
//!
//! while let Ok(event) = rx.recv() {
//!     target.scan(&event).await?;
//! }
//! ```

use crossbeam_channel::{Receiver, Sender, bounded};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, event::CreateKind};
use notify_debouncer_full::{DebounceEventResult, Debouncer, RecommendedCache, new_debouncer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::target::ScanEvent;

/// Handle to a running file watcher.
///
/// Dropping this handle will stop the watcher.
pub struct FileWatcher {
    debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
    running: Arc<AtomicBool>,
}

impl FileWatcher {
    /// Create a new file watcher for the given directories.
    ///
    /// Returns the watcher handle and a receiver for scan events.
    pub fn new(
        watch_paths: Vec<PathBuf>,
        debounce: Duration,
    ) -> Result<(Self, Receiver<ScanEvent>), WatchError> {
        let (tx, rx) = bounded(256);
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = Arc::clone(&running);

        let debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            if !running_clone.load(Ordering::Relaxed) {
                return;
            }
            Self::handle_debounced_events(result, &tx);
        })
        .map_err(|e| WatchError::Init(e.to_string()))?;

        let mut watcher = Self { debouncer, running };

        for path in watch_paths {
            watcher.watch(&path)?;
        }

        Ok((watcher, rx))
    }

    /// Add a directory to watch.
    pub fn watch(&mut self, path: &Path) -> Result<(), WatchError> {
        tracing::info!(target: "jellyfin_relay::watcher", path = %path.display(), "Watching directory");
        self.debouncer
            .watch(path, RecursiveMode::Recursive)
            .map_err(|e| WatchError::Watch(format!("{}: {}", path.display(), e)))
    }

    /// Handle debounced events from notify.
    fn handle_debounced_events(result: DebounceEventResult, tx: &Sender<ScanEvent>) {
        match result {
            Ok(events) => {
                for folder in affected_folders(events.iter().map(|e| &e.event)) {
                    tracing::debug!(target: "jellyfin_relay::watcher", folder = %folder.display(), "Folder changed");
                    let event = ScanEvent::new(folder.to_string_lossy());
                    if tx.try_send(event).is_err() {
                        tracing::warn!(target: "jellyfin_relay::watcher", folder = %folder.display(), "Event queue full, dropping change");
                    }
                }
            }
            Err(errors) => {
                for error in errors {
                    tracing::warn!(target: "jellyfin_relay::watcher", error = %error, "Watch error");
                }
            }
        }
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        tracing::debug!(target: "jellyfin_relay::watcher", "File watcher stopped");
    }
}

/// Reduce a batch of raw events to the distinct folders they touched.
///
/// Order of first appearance is kept.
pub fn affected_folders<'a>(events: impl IntoIterator<Item = &'a notify::Event>) -> Vec<PathBuf> {
    let mut folders: Vec<PathBuf> = Vec::new();
    for event in events {
        for path in &event.paths {
            if let Some(folder) = affected_folder(&event.kind, path)
                && !folders.contains(&folder)
            {
                folders.push(folder);
            }
        }
    }
    folders
}

/// The folder to rescan for one changed path.
fn affected_folder(kind: &EventKind, path: &Path) -> Option<PathBuf> {
    match kind {
        EventKind::Access(_) => None,
        EventKind::Create(CreateKind::Folder) => Some(path.to_path_buf()),
        _ => path.parent().map(Path::to_path_buf),
    }
}

/// Errors that can occur during file watching.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WatchError {
    #[error("Failed to initialize watcher: {0}")]
    Init(String),
    #[error("Failed to watch path: {0}")]
    Watch(String),
}
