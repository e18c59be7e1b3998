//! Trait definition for the Jellyfin API client.
//!
//! The target talks to Jellyfin only through [`JellyfinApi`], so tests can
//! substitute a scripted client and assert on exactly which remote calls
//! were made.
//!
//! # Example
//!
//! ```ignore
//! use jellyfin_relay::target::traits::JellyfinApi;
//!
//! async fn probe<T: JellyfinApi>(client: &T) -> bool {
//!     client.available().await.is_ok()
//! }
//! ```

use async_trait::async_trait;

use super::domain::{Library, TargetError};

/// Operations the target consumes from the Jellyfin server.
///
/// Each call may fail independently; implementations decide their own
/// connection reuse and timeouts.
#[async_trait]
pub trait JellyfinApi: Send + Sync {
    /// List every library location known to the server.
    async fn libraries(&self) -> Result<Vec<Library>, TargetError>;

    /// Check that the server is reachable and accepts our token.
    async fn available(&self) -> Result<(), TargetError>;

    /// Resolve the view id of the named library for a user.
    async fn view_id(&self, user_id: &str, library: &str) -> Result<String, TargetError>;

    /// Find the id of the item inside a view whose path equals `path`.
    async fn find_item_id_by_path(
        &self,
        user_id: &str,
        view_id: &str,
        path: &str,
    ) -> Result<String, TargetError>;

    /// Refresh a single item and its children.
    async fn refresh_item(&self, item_id: &str) -> Result<(), TargetError>;

    /// Ask the server to rescan the library containing `path`.
    async fn scan(&self, path: &str) -> Result<(), TargetError>;
}

#[async_trait]
impl JellyfinApi for crate::jellyfin::JellyfinClient {
    async fn libraries(&self) -> Result<Vec<Library>, TargetError> {
        self.libraries().await
    }

    async fn available(&self) -> Result<(), TargetError> {
        self.available().await
    }

    async fn view_id(&self, user_id: &str, library: &str) -> Result<String, TargetError> {
        self.view_id(user_id, library).await
    }

    async fn find_item_id_by_path(
        &self,
        user_id: &str,
        view_id: &str,
        path: &str,
    ) -> Result<String, TargetError> {
        self.find_item_id_by_path(user_id, view_id, path).await
    }

    async fn refresh_item(&self, item_id: &str) -> Result<(), TargetError> {
        self.refresh_item(item_id).await
    }

    async fn scan(&self, path: &str) -> Result<(), TargetError> {
        self.scan(path).await
    }
}
