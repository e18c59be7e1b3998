//! Internal domain models for the Jellyfin target.
//!
//! These types are OUR types - they don't change when the Jellyfin API changes.
//! Responses from the server get converted into these types via the adapter.

/// A Jellyfin library location, as captured at startup.
///
/// A virtual folder with several locations yields one `Library` per location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    /// Library (virtual folder) name
    pub name: String,
    /// Root path on the Jellyfin side
    pub path: String,
}

impl Library {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A "folder changed" notification from the upstream watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    /// Changed folder, in the watcher's view of the filesystem
    pub folder: String,
}

impl ScanEvent {
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
        }
    }
}

/// Why a full library scan was issued instead of a precise item refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Precise refresh is turned off in the configuration
    Disabled,
    /// The library's view id could not be resolved
    ViewLookup(TargetError),
    /// No item could be matched by its exact path
    ItemLookup(TargetError),
    /// The server matched an item but reported an empty id
    EmptyItemId,
    /// The item was found but refreshing it failed
    ItemRefresh { item_id: String, error: TargetError },
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "precise refresh disabled"),
            Self::ViewLookup(e) => write!(f, "view lookup failed: {}", e),
            Self::ItemLookup(e) => write!(f, "item lookup failed: {}", e),
            Self::EmptyItemId => write!(f, "item lookup returned an empty id"),
            Self::ItemRefresh { item_id, error } => {
                write!(f, "refresh of item {} failed: {}", item_id, error)
            }
        }
    }
}

/// How a scan event was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// No library owns the path; nothing was sent to Jellyfin
    Skipped { path: String },
    /// The matching item was refreshed recursively
    Refreshed { item_id: String },
    /// A library scan was requested for the path
    Scanned { reason: FallbackReason },
}

/// Errors that can occur while talking to Jellyfin
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("Jellyfin unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid Jellyfin token: {0}")]
    Unauthorized(String),

    #[error("Unexpected Jellyfin response: {0}")]
    Fatal(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No view named {0:?} for this user")]
    ViewNotFound(String),

    #[error("No item with path {0:?}")]
    ItemNotFound(String),

    #[error("{0}: failed determining library")]
    NoMatchingLibrary(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl TargetError {
    /// Whether the server could not be reached or is temporarily failing.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
