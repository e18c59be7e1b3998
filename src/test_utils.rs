//! Test utilities and fixtures for jellyfin-relay tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{jellyfin_config, sample_libraries};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let mock = MockJellyfin::healthy(sample_libraries());
//!     let config = jellyfin_config(true);
//!     // ... test logic
//! }
//! ```

use crate::config::JellyfinConfig;
use crate::target::Library;

/// Two libraries, Movies then TV, in the order Jellyfin would list them.
pub fn sample_libraries() -> Vec<Library> {
    vec![
        Library::new("Movies", "/data/movies"),
        Library::new("TV", "/data/tv"),
    ]
}

/// Target config with no rewrite rules and no library override.
///
/// Use struct update syntax to customize:
///
/// ```ignore
/// let config = JellyfinConfig {
///     library: "Filmy".to_string(),
///     ..jellyfin_config(true)
/// };
/// ```
pub fn jellyfin_config(precise_refresh: bool) -> JellyfinConfig {
    JellyfinConfig {
        url: "http://jellyfin.test:8096".to_string(),
        token: "test-token".to_string(),
        user_id: "user-1".to_string(),
        library: String::new(),
        precise_refresh,
        rewrite: Vec::new(),
        verbosity: "trace".to_string(),
    }
}
