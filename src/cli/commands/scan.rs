//! One-off scans and the watch loop.

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, error, info};

use super::connect;
use crate::config::Config;
use crate::scanner::FileWatcher;
use crate::target::{FallbackReason, JellyfinTarget, ScanEvent, ScanOutcome};

/// Forward a single folder-changed event
pub fn cmd_scan(rt: &Runtime, config: Config, folder: &str) -> anyhow::Result<()> {
    rt.block_on(scan_once(config, folder))
}

async fn scan_once(config: Config, folder: &str) -> anyhow::Result<()> {
    let target = connect(config.jellyfin).await?;
    let outcome = target
        .scan(&ScanEvent::new(folder))
        .await
        .with_context(|| format!("Scan of {} failed", folder))?;

    match outcome {
        ScanOutcome::Skipped { path } => {
            println!("No Jellyfin library contains {}; nothing to do", path)
        }
        ScanOutcome::Refreshed { item_id } => println!("Refreshed item {}", item_id),
        ScanOutcome::Scanned {
            reason: FallbackReason::Disabled,
        } => println!("Library scan requested"),
        ScanOutcome::Scanned { reason } => println!("Library scan requested ({})", reason),
    }
    Ok(())
}

/// Watch folders and forward every change until Ctrl+C
pub fn cmd_watch(rt: &Runtime, config: Config, paths: &[PathBuf]) -> anyhow::Result<()> {
    rt.block_on(watch(config, paths))
}

async fn watch(config: Config, paths: &[PathBuf]) -> anyhow::Result<()> {
    let watch_paths = if paths.is_empty() {
        config.watch.paths.clone()
    } else {
        paths.to_vec()
    };
    if watch_paths.is_empty() {
        anyhow::bail!("Nothing to watch: pass directories or set watch.paths in the config");
    }

    let target = Arc::new(connect(config.jellyfin).await?);
    let debounce = Duration::from_millis(config.watch.debounce_ms);
    let (watcher, rx) =
        FileWatcher::new(watch_paths.clone(), debounce).context("Failed to start file watcher")?;

    for path in &watch_paths {
        println!("Watching for changes in: {}", path.display());
    }
    println!("Press Ctrl+C to stop.\n");

    // The watcher channel is blocking, so drain it on a blocking thread and
    // hand each event to the runtime. Events for different folders run
    // concurrently against the shared target.
    let handle = tokio::runtime::Handle::current();
    let dispatcher = tokio::task::spawn_blocking(move || {
        while let Ok(event) = rx.recv() {
            let target = Arc::clone(&target);
            handle.spawn(async move { dispatch(&target, event).await });
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;
    info!(target: "jellyfin_relay::watch", "Stopping watcher");

    // Dropping the watcher closes the channel, which ends the dispatcher
    drop(watcher);
    dispatcher.await?;
    Ok(())
}

async fn dispatch(target: &JellyfinTarget, event: ScanEvent) {
    match target.scan(&event).await {
        Ok(outcome) => {
            debug!(target: "jellyfin_relay::watch", folder = %event.folder, ?outcome, "Event handled")
        }
        Err(e) => {
            error!(target: "jellyfin_relay::watch", folder = %event.folder, error = %e, "Scan failed")
        }
    }
}
