//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `scan`: one-off scan events and the watch loop
//! - `health`: availability probe and library listing

mod health;
mod scan;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::{self, Config, JellyfinConfig};
use crate::target::JellyfinTarget;

pub use health::{cmd_check, cmd_libraries};
pub use scan::{cmd_scan, cmd_watch};

/// Jellyfin Relay CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to the OS config directory)
    #[arg(long, global = true, env = "JELLYFIN_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Send a single folder-changed event to Jellyfin
    Scan {
        /// Changed folder, as seen on this machine
        folder: String,
    },
    /// Check that Jellyfin is reachable and accepts the token
    Check,
    /// List the Jellyfin libraries and their root paths
    Libraries,
    /// Watch folders and forward every change to Jellyfin
    Watch {
        /// Directories to watch (default: watch.paths from the config)
        paths: Vec<PathBuf>,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let rt = Runtime::new()?;

    match &cli.command {
        Commands::Scan { folder } => cmd_scan(&rt, config, folder),
        Commands::Check => cmd_check(&rt, config),
        Commands::Libraries => cmd_libraries(&rt, config),
        Commands::Watch { paths } => cmd_watch(&rt, config, paths),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = match &cli.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    };
    config.context("Failed to load configuration")
}

/// Build the target, fetching the library list once
pub(crate) async fn connect(config: JellyfinConfig) -> anyhow::Result<JellyfinTarget> {
    let url = config.url.clone();
    JellyfinTarget::new(config)
        .await
        .with_context(|| format!("Failed to set up Jellyfin target at {}", url))
}
