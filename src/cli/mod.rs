//! Command-line interface for jellyfin-relay.
//!
//! This module provides CLI commands for one-off scans, health checks and
//! the long-running watch mode.

mod commands;

pub use commands::{Cli, Commands, run_command};
