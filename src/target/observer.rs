//! Observability hooks for the target.
//!
//! The resolver and orchestrator never log directly. They report
//! [`TargetEvent`]s to a [`ScanObserver`], which in production forwards them
//! to `tracing` and in tests records them for assertions.

use tracing::Level;

use super::domain::{FallbackReason, Library, TargetError};

/// Something notable that happened while handling a scan event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetEvent {
    /// The library snapshot was captured at construction
    LibrariesLoaded { libraries: Vec<Library> },
    /// No library owns the path; the event is dropped
    NoLibrary { path: String, error: TargetError },
    /// A precise refresh is about to be attempted
    PreciseAttempt { path: String, library: String },
    /// The precise refresh was abandoned in favour of a library scan
    Fallback {
        path: String,
        library: String,
        reason: FallbackReason,
    },
    /// The matched item was refreshed
    Refreshed {
        path: String,
        library: String,
        item_id: String,
    },
    /// A library scan is about to be requested
    ScanRequested { path: String, library: String },
    /// The library scan was accepted by the server
    Scanned { path: String, library: String },
}

impl TargetEvent {
    /// Severity the event is reported at.
    pub fn level(&self) -> Level {
        match self {
            Self::LibrariesLoaded { .. } => Level::DEBUG,
            Self::NoLibrary { .. } => Level::WARN,
            Self::PreciseAttempt { .. } | Self::ScanRequested { .. } => Level::TRACE,
            Self::Fallback {
                reason: FallbackReason::ItemRefresh { .. },
                ..
            } => Level::ERROR,
            Self::Fallback { .. } => Level::WARN,
            Self::Refreshed { .. } | Self::Scanned { .. } => Level::INFO,
        }
    }
}

/// Receiver for [`TargetEvent`]s.
///
/// Must be shareable across concurrently handled scan events.
pub trait ScanObserver: Send + Sync {
    fn record(&self, event: &TargetEvent);
}

/// Parse a configured verbosity (`trace`, `debug`, `info`, `warn`, `error`).
///
/// Empty means `info`. Unknown values fall back to `info` with a warning.
pub fn parse_verbosity(value: &str) -> Level {
    let value = value.trim();
    if value.is_empty() {
        return Level::INFO;
    }
    value.parse().unwrap_or_else(|_| {
        tracing::warn!(target: "jellyfin_relay::target", verbosity = value, "Unknown verbosity, using info");
        Level::INFO
    })
}

macro_rules! emit {
    ($level:expr, $($args:tt)+) => {
        if $level == Level::ERROR {
            tracing::error!($($args)+)
        } else if $level == Level::WARN {
            tracing::warn!($($args)+)
        } else if $level == Level::INFO {
            tracing::info!($($args)+)
        } else if $level == Level::DEBUG {
            tracing::debug!($($args)+)
        } else {
            tracing::trace!($($args)+)
        }
    };
}

/// Forwards events to `tracing`, filtered by the target's own verbosity.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    verbosity: Level,
    url: String,
}

impl TracingObserver {
    pub fn new(verbosity: Level, url: impl Into<String>) -> Self {
        Self {
            verbosity,
            url: url.into(),
        }
    }

    /// Whether events at `level` pass this target's verbosity.
    pub fn enabled(&self, level: Level) -> bool {
        level <= self.verbosity
    }
}

impl ScanObserver for TracingObserver {
    fn record(&self, event: &TargetEvent) {
        let level = event.level();
        if !self.enabled(level) {
            return;
        }
        let url = self.url.as_str();

        match event {
            TargetEvent::LibrariesLoaded { libraries } => emit!(
                level,
                target: "jellyfin_relay::target", url, count = libraries.len(), libraries = ?libraries,
                "Retrieved libraries"
            ),
            TargetEvent::NoLibrary { path, error } => emit!(
                level,
                target: "jellyfin_relay::target", url, path = %path, error = %error,
                "No target libraries found"
            ),
            TargetEvent::PreciseAttempt { path, library } => emit!(
                level,
                target: "jellyfin_relay::target", url, path = %path, library = %library,
                "Trying precise refresh by item id"
            ),
            TargetEvent::Fallback {
                path,
                library,
                reason,
            } => emit!(
                level,
                target: "jellyfin_relay::target", url, path = %path, library = %library, reason = %reason,
                "Precise refresh not possible; falling back to library scan"
            ),
            TargetEvent::Refreshed {
                path,
                library,
                item_id,
            } => emit!(
                level,
                target: "jellyfin_relay::target", url, path = %path, library = %library, item_id = %item_id,
                "Refreshed item recursively"
            ),
            TargetEvent::ScanRequested { path, library } => emit!(
                level,
                target: "jellyfin_relay::target", url, path = %path, library = %library,
                "Sending library scan request"
            ),
            TargetEvent::Scanned { path, library } => emit!(
                level,
                target: "jellyfin_relay::target", url, path = %path, library = %library,
                "Scan moved to target"
            ),
        }
    }
}

/// Observer that keeps every event, for assertions in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: parking_lot::Mutex<Vec<TargetEvent>>,
}

#[cfg(test)]
impl RecordingObserver {
    pub fn events(&self) -> Vec<TargetEvent> {
        self.events.lock().clone()
    }

    /// Events reported at WARN or ERROR.
    pub fn warnings(&self) -> Vec<TargetEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.level() <= Level::WARN)
            .collect()
    }
}

#[cfg(test)]
impl ScanObserver for RecordingObserver {
    fn record(&self, event: &TargetEvent) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verbosity() {
        assert_eq!(parse_verbosity(""), Level::INFO);
        assert_eq!(parse_verbosity("debug"), Level::DEBUG);
        assert_eq!(parse_verbosity("WARN"), Level::WARN);
        assert_eq!(parse_verbosity(" trace "), Level::TRACE);
        assert_eq!(parse_verbosity("chatty"), Level::INFO);
    }

    #[test]
    fn test_verbosity_gate() {
        let observer = TracingObserver::new(Level::WARN, "http://jellyfin:8096");
        assert!(observer.enabled(Level::ERROR));
        assert!(observer.enabled(Level::WARN));
        assert!(!observer.enabled(Level::INFO));
        assert!(!observer.enabled(Level::TRACE));
    }

    #[test]
    fn test_event_levels() {
        let refresh_failed = TargetEvent::Fallback {
            path: "/p".into(),
            library: "Movies".into(),
            reason: FallbackReason::ItemRefresh {
                item_id: "42".into(),
                error: TargetError::Unavailable("503".into()),
            },
        };
        assert_eq!(refresh_failed.level(), Level::ERROR);

        let view_missing = TargetEvent::Fallback {
            path: "/p".into(),
            library: "Movies".into(),
            reason: FallbackReason::EmptyItemId,
        };
        assert_eq!(view_missing.level(), Level::WARN);

        let scanned = TargetEvent::Scanned {
            path: "/p".into(),
            library: "Movies".into(),
        };
        assert_eq!(scanned.level(), Level::INFO);
    }

    #[test]
    fn test_recording_observer_filters_warnings() {
        let observer = RecordingObserver::default();
        observer.record(&TargetEvent::ScanRequested {
            path: "/p".into(),
            library: "Movies".into(),
        });
        observer.record(&TargetEvent::NoLibrary {
            path: "/q".into(),
            error: TargetError::NoMatchingLibrary("/q".into()),
        });

        assert_eq!(observer.events().len(), 2);
        assert_eq!(observer.warnings().len(), 1);
    }

    #[test]
    fn test_tracing_observer_records_without_subscriber() {
        let observer = TracingObserver::new(Level::TRACE, "http://jellyfin:8096");
        observer.record(&TargetEvent::LibrariesLoaded {
            libraries: vec![Library::new("Movies", "/data/movies/")],
        });
    }
}
