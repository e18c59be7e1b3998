//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors (e.g., [`TargetError`]) for detailed handling
//! - All errors implement `std::error::Error` for compatibility

use crate::config::ConfigError;
use crate::rewrite::RewriteError;
use crate::scanner::watcher::WatchError;
use crate::target::TargetError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid rewrite rule
    #[error("Rewrite error: {0}")]
    Rewrite(#[from] RewriteError),

    /// Jellyfin request failed
    #[error("Jellyfin error: {0}")]
    Target(#[from] TargetError),

    /// Filesystem watcher error
    #[error("Watch error: {0}")]
    Watch(#[from] WatchError),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_with_context() {
        let err = Error::from(TargetError::Unavailable("connection refused".into()))
            .context("while fetching libraries");
        let msg = err.to_string();
        assert!(msg.contains("while fetching libraries"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_result_ext() {
        let result: std::result::Result<(), TargetError> =
            Err(TargetError::Unauthorized("HTTP 401: Unauthorized".into()));
        let with_ctx = result.with_context("probing jellyfin");
        assert!(with_ctx.unwrap_err().to_string().contains("probing jellyfin"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: Error = ConfigError::Missing("jellyfin.url").into();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("jellyfin.url"));
    }
}
