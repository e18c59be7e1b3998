//! Jellyfin target - turns "folder changed" events into Jellyfin refreshes.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - libraries, scan events, outcomes, errors
//! - **Resolver** (`resolver.rs`) - finds the library owning a path
//! - **Orchestrator** (`orchestrator.rs`) - precise refresh with library scan fallback
//! - **Observer** (`observer.rs`) - injected logging of what happened
//! - **Traits** (`traits.rs`) - the Jellyfin API seam, mockable in tests
//!
//! An event flows: rewrite → resolve → refresh. The library list is fetched
//! once at construction and never refreshed, so libraries added on the server
//! later are not seen until the target is rebuilt.
//!
//! # Usage
//!
//! ```ignore
//! let target = Arc::new(JellyfinTarget::new(config.jellyfin).await?);
//!
//! // Safe to call from many tasks at once
//! target.scan(&ScanEvent::new("/mnt/media/movies/Inception")).await?;
//! ```

pub mod domain;
pub mod observer;
pub mod orchestrator;
pub mod resolver;
pub mod traits;

use std::sync::Arc;

pub use domain::{FallbackReason, Library, ScanEvent, ScanOutcome, TargetError};
pub use observer::{ScanObserver, TargetEvent, TracingObserver};
pub use traits::JellyfinApi;

use crate::config::JellyfinConfig;
use crate::error::Result;
use crate::jellyfin::JellyfinClient;
use crate::rewrite::Rewriter;
use orchestrator::RefreshPlan;

/// A Jellyfin server as a destination for scan events.
pub struct JellyfinTarget {
    config: JellyfinConfig,
    libraries: Arc<[Library]>,
    rewriter: Rewriter,
    api: Box<dyn JellyfinApi>,
    observer: Arc<dyn ScanObserver>,
}

impl JellyfinTarget {
    /// Connect to the configured server and capture its libraries.
    ///
    /// Fails if a rewrite rule is invalid or the library list can't be fetched.
    pub async fn new(config: JellyfinConfig) -> Result<Self> {
        let rewriter = Rewriter::new(&config.rewrite)?;
        let api = JellyfinClient::new(&config.url, &config.token)?;
        let observer = Arc::new(TracingObserver::new(
            observer::parse_verbosity(&config.verbosity),
            config.url.clone(),
        ));

        Self::build(config, rewriter, Box::new(api), observer).await
    }

    /// Build a target over an injected client and observer.
    pub async fn with_api(
        config: JellyfinConfig,
        api: Box<dyn JellyfinApi>,
        observer: Arc<dyn ScanObserver>,
    ) -> Result<Self> {
        let rewriter = Rewriter::new(&config.rewrite)?;
        Self::build(config, rewriter, api, observer).await
    }

    async fn build(
        config: JellyfinConfig,
        rewriter: Rewriter,
        api: Box<dyn JellyfinApi>,
        observer: Arc<dyn ScanObserver>,
    ) -> Result<Self> {
        let libraries = api.libraries().await?;
        observer.record(&TargetEvent::LibrariesLoaded {
            libraries: libraries.clone(),
        });

        Ok(Self {
            config,
            libraries: libraries.into(),
            rewriter,
            api,
            observer,
        })
    }

    /// Libraries captured at construction, in server order.
    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    /// Health probe, delegated to the server.
    pub async fn available(&self) -> std::result::Result<(), TargetError> {
        self.api.available().await
    }

    /// Handle one scan event.
    ///
    /// A path outside every library is not an error: the event is dropped with
    /// a warning and `ScanOutcome::Skipped` is returned. The only error ever
    /// returned is a failed library scan.
    pub async fn scan(&self, event: &ScanEvent) -> std::result::Result<ScanOutcome, TargetError> {
        let folder = self.rewriter.rewrite(&event.folder);

        let library = match resolver::resolve(&folder, &self.libraries) {
            Ok(library) => library,
            Err(error) => {
                self.observer.record(&TargetEvent::NoLibrary {
                    path: folder.clone(),
                    error,
                });
                return Ok(ScanOutcome::Skipped { path: folder });
            }
        };

        let plan = RefreshPlan {
            library,
            path: &folder,
            user_id: &self.config.user_id,
            library_override: &self.config.library,
            precise_refresh: self.config.precise_refresh,
        };

        orchestrator::refresh(self.api.as_ref(), self.observer.as_ref(), &plan).await
    }
}

impl std::fmt::Debug for JellyfinTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JellyfinTarget")
            .field("url", &self.config.url)
            .field("libraries", &self.libraries)
            .field("precise_refresh", &self.config.precise_refresh)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::rewrite::RewriteRule;
    use crate::target::observer::RecordingObserver;
    use crate::target::traits::mocks::{Call, MockJellyfin};
    use crate::test_utils::{jellyfin_config, sample_libraries};

    async fn target_with(
        config: JellyfinConfig,
        mock: MockJellyfin,
    ) -> (JellyfinTarget, Arc<RecordingObserver>) {
        let observer = Arc::new(RecordingObserver::default());
        let target = JellyfinTarget::with_api(config, Box::new(mock), observer.clone())
            .await
            .unwrap();
        (target, observer)
    }

    #[tokio::test]
    async fn test_precise_disabled_scans_folder_once() {
        let mock = MockJellyfin::healthy(sample_libraries());
        let log = mock.log();
        let (target, _) = target_with(jellyfin_config(false), mock).await;

        let outcome = target
            .scan(&ScanEvent::new("/data/movies/Inception"))
            .await
            .unwrap();

        assert!(matches!(outcome, ScanOutcome::Scanned { .. }));
        assert_eq!(
            log.after_startup(),
            vec![Call::Scan("/data/movies/Inception".to_string())]
        );
    }

    #[tokio::test]
    async fn test_precise_enabled_refreshes_item_without_scan() {
        let mock = MockJellyfin::healthy(sample_libraries());
        let log = mock.log();
        let (target, _) = target_with(jellyfin_config(true), mock).await;

        let outcome = target
            .scan(&ScanEvent::new("/data/movies/Inception"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ScanOutcome::Refreshed {
                item_id: "42".to_string()
            }
        );
        assert!(log.calls().contains(&Call::RefreshItem("42".to_string())));
        assert_eq!(log.count(|c| matches!(c, Call::Scan(_))), 0);
    }

    #[tokio::test]
    async fn test_unknown_library_makes_no_remote_calls() {
        let mock = MockJellyfin::healthy(sample_libraries());
        let log = mock.log();
        let (target, observer) = target_with(jellyfin_config(true), mock).await;

        let outcome = target.scan(&ScanEvent::new("/data/music/x")).await.unwrap();

        assert_eq!(
            outcome,
            ScanOutcome::Skipped {
                path: "/data/music/x".to_string()
            }
        );
        assert!(log.after_startup().is_empty());
        assert!(matches!(
            observer.warnings().as_slice(),
            [TargetEvent::NoLibrary { .. }]
        ));
    }

    #[tokio::test]
    async fn test_folder_is_rewritten_before_resolution() {
        let mut config = jellyfin_config(false);
        config.rewrite = vec![RewriteRule::new("^/mnt/media/", "/data/")];
        let mock = MockJellyfin::healthy(sample_libraries());
        let log = mock.log();
        let (target, _) = target_with(config, mock).await;

        target
            .scan(&ScanEvent::new("/mnt/media/tv/Severance"))
            .await
            .unwrap();

        assert_eq!(
            log.after_startup(),
            vec![Call::Scan("/data/tv/Severance".to_string())]
        );
    }

    #[tokio::test]
    async fn test_scan_failure_propagates() {
        let mock = MockJellyfin::healthy(sample_libraries())
            .with_scan(Err(TargetError::Unavailable("connection refused".to_string())));
        let (target, _) = target_with(jellyfin_config(false), mock).await;

        let err = target
            .scan(&ScanEvent::new("/data/tv/Severance"))
            .await
            .unwrap_err();

        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_library_fetch_failure_fails_construction() {
        let mut mock = MockJellyfin::healthy(vec![]);
        mock.libraries = Err(TargetError::Unauthorized("401 Unauthorized".to_string()));

        let result = JellyfinTarget::with_api(
            jellyfin_config(true),
            Box::new(mock),
            Arc::new(RecordingObserver::default()),
        )
        .await;

        assert!(matches!(
            result,
            Err(Error::Target(TargetError::Unauthorized(_)))
        ));
    }

    #[tokio::test]
    async fn test_invalid_rewrite_fails_before_any_call() {
        let mut config = jellyfin_config(true);
        config.rewrite = vec![RewriteRule::new("([unclosed", "/data/")];
        let mock = MockJellyfin::healthy(sample_libraries());
        let log = mock.log();

        let result = JellyfinTarget::with_api(
            config,
            Box::new(mock),
            Arc::new(RecordingObserver::default()),
        )
        .await;

        assert!(matches!(result, Err(Error::Rewrite(_))));
        assert!(log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_captured_once() {
        let mock = MockJellyfin::healthy(sample_libraries());
        let log = mock.log();
        let (target, observer) = target_with(jellyfin_config(false), mock).await;

        for folder in ["/data/movies/a", "/data/tv/b", "/data/movies/c"] {
            target.scan(&ScanEvent::new(folder)).await.unwrap();
        }

        assert_eq!(target.libraries(), sample_libraries().as_slice());
        assert_eq!(log.count(|c| *c == Call::Libraries), 1);
        assert!(matches!(
            observer.events().first(),
            Some(TargetEvent::LibrariesLoaded { .. })
        ));
    }

    #[tokio::test]
    async fn test_available_delegates() {
        let mut mock = MockJellyfin::healthy(sample_libraries());
        mock.available = Err(TargetError::Unavailable("502 Bad Gateway".to_string()));
        let log = mock.log();
        let (target, _) = target_with(jellyfin_config(false), mock).await;

        assert!(target.available().await.is_err());
        assert_eq!(log.after_startup(), vec![Call::Available]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_scans_share_one_target() {
        let mock = MockJellyfin::healthy(sample_libraries());
        let log = mock.log();
        let (target, _) = target_with(jellyfin_config(false), mock).await;
        let target = Arc::new(target);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let target = Arc::clone(&target);
                tokio::spawn(async move {
                    target
                        .scan(&ScanEvent::new(format!("/data/movies/film-{}", i)))
                        .await
                })
            })
            .collect();

        for result in futures::future::join_all(handles).await {
            assert!(result.unwrap().is_ok());
        }
        assert_eq!(log.count(|c| matches!(c, Call::Scan(_))), 16);
    }
}
