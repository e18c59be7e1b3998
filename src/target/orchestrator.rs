//! Refresh orchestration for a single scan event.
//!
//! With precise refresh enabled the orchestrator tries, in order:
//! 1. Resolve the library's view id for the configured user
//! 2. Find the item whose path equals the scanned folder exactly
//! 3. Refresh that item recursively
//!
//! Any failure along the way degrades to a full library scan. Only the
//! library scan's own failure is returned to the caller. No step is retried.

use super::domain::{FallbackReason, Library, ScanOutcome, TargetError};
use super::observer::{ScanObserver, TargetEvent};
use super::traits::JellyfinApi;

/// Everything the orchestrator needs to handle one resolved event.
#[derive(Debug, Clone, Copy)]
pub struct RefreshPlan<'a> {
    /// Library that owns `path`
    pub library: &'a Library,
    /// Rewritten folder, in Jellyfin's view
    pub path: &'a str,
    /// Jellyfin user the view and item queries run as
    pub user_id: &'a str,
    /// Configured library name for the view lookup (blank = use `library`)
    pub library_override: &'a str,
    /// Whether to attempt a precise item refresh at all
    pub precise_refresh: bool,
}

impl RefreshPlan<'_> {
    /// Library name used to look up the view id.
    pub fn view_library(&self) -> &str {
        if self.library_override.trim().is_empty() {
            &self.library.name
        } else {
            self.library_override
        }
    }
}

/// Result of the precise refresh attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// The item was refreshed; nothing else to do
    Handled(String),
    /// The attempt was abandoned; a library scan must follow
    Fallback(FallbackReason),
}

/// Handle one event: precise refresh if possible, library scan otherwise.
pub async fn refresh(
    api: &dyn JellyfinApi,
    observer: &dyn ScanObserver,
    plan: &RefreshPlan<'_>,
) -> Result<ScanOutcome, TargetError> {
    let path = plan.path.to_string();
    let library = plan.library.name.clone();

    let reason = if plan.precise_refresh {
        observer.record(&TargetEvent::PreciseAttempt {
            path: path.clone(),
            library: library.clone(),
        });

        match precise_refresh(api, plan).await {
            Attempt::Handled(item_id) => {
                observer.record(&TargetEvent::Refreshed {
                    path,
                    library,
                    item_id: item_id.clone(),
                });
                return Ok(ScanOutcome::Refreshed { item_id });
            }
            Attempt::Fallback(reason) => {
                observer.record(&TargetEvent::Fallback {
                    path: path.clone(),
                    library: library.clone(),
                    reason: reason.clone(),
                });
                reason
            }
        }
    } else {
        FallbackReason::Disabled
    };

    observer.record(&TargetEvent::ScanRequested {
        path: path.clone(),
        library: library.clone(),
    });
    api.scan(plan.path).await?;
    observer.record(&TargetEvent::Scanned { path, library });

    Ok(ScanOutcome::Scanned { reason })
}

/// Try to refresh exactly the item at `plan.path`.
pub async fn precise_refresh(api: &dyn JellyfinApi, plan: &RefreshPlan<'_>) -> Attempt {
    let view_id = match api.view_id(plan.user_id, plan.view_library()).await {
        Ok(id) => id,
        Err(e) => return Attempt::Fallback(FallbackReason::ViewLookup(e)),
    };

    let item_id = match api
        .find_item_id_by_path(plan.user_id, &view_id, plan.path)
        .await
    {
        Ok(id) => id,
        Err(e) => return Attempt::Fallback(FallbackReason::ItemLookup(e)),
    };

    if item_id.trim().is_empty() {
        return Attempt::Fallback(FallbackReason::EmptyItemId);
    }

    match api.refresh_item(&item_id).await {
        Ok(()) => Attempt::Handled(item_id),
        Err(error) => Attempt::Fallback(FallbackReason::ItemRefresh { item_id, error }),
    }
}
