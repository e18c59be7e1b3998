//! Jellyfin Relay - forwards folder-changed events to a Jellyfin server.
//!
//! Each change is rewritten into Jellyfin's view of the filesystem, matched to
//! the library that owns it, and turned into either a precise refresh of the
//! changed item or a scan of the library. Run `jellyfin-relay watch` to follow
//! local folders, or `jellyfin-relay scan <folder>` for a single event.

pub mod cli;
pub mod config;
pub mod error;
pub mod jellyfin;
pub mod rewrite;
pub mod scanner;
pub mod target;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging. Target events are let through at every level; the
    // configured `jellyfin.verbosity` decides which of them are emitted.
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::from_default_env()
                .add_directive("jellyfin_relay=info".parse()?)
                .add_directive("jellyfin_relay::target=trace".parse()?),
        )
        .init();

    cli::run_command(&args)
}
