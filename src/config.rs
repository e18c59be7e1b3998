//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory unless `--config`
//! points elsewhere:
//! - Windows: %APPDATA%\jellyfin-relay\config.toml
//! - macOS: ~/Library/Application Support/jellyfin-relay/config.toml
//! - Linux: ~/.config/jellyfin-relay/config.toml
//!
//! The config is read once at startup and never changes afterwards.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::rewrite::RewriteRule;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Jellyfin target settings
    pub jellyfin: JellyfinConfig,

    /// Filesystem watcher settings
    pub watch: WatchConfig,
}

/// Jellyfin target settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JellyfinConfig {
    /// Base URL of the Jellyfin server
    pub url: String,

    /// API token sent as `X-Emby-Token`
    pub token: String,

    /// User the view and item lookups run as (needed for precise refresh)
    pub user_id: String,

    /// Library name for the view lookup; empty = the library matched by path
    pub library: String,

    /// Refresh the changed item instead of scanning the whole library
    pub precise_refresh: bool,

    /// Path rewrite rules, watcher view -> Jellyfin view
    pub rewrite: Vec<RewriteRule>,

    /// Log verbosity for this target: trace, debug, info, warn, error
    pub verbosity: String,
}

/// Filesystem watcher settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Directories to watch recursively
    pub paths: Vec<PathBuf>,

    /// Quiet period before a burst of changes is reported
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            debounce_ms: 500,
        }
    }
}

impl Config {
    /// Check the settings the target can't run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jellyfin.url.trim().is_empty() {
            return Err(ConfigError::Missing("jellyfin.url"));
        }
        Ok(())
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("jellyfin-relay"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
pub fn load() -> Result<Config, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    load_from(&path)
}

/// Load and validate configuration from `path`
///
/// Unlike a UI app there is no usable default: without a server URL the
/// relay can't do anything, so a missing or broken file is an error.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config: Config =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    config.validate()?;

    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Missing required setting `{0}`")]
    Missing(&'static str),
}

// ============================================================================
// Tests
// ============================================================================
