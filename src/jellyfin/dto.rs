//! Jellyfin API Data Transfer Objects
//!
//! These types match what the Jellyfin API sends and expects.
//! DO NOT use these types outside the jellyfin module - convert to domain types.
//!
//! API Reference: https://api.jellyfin.org/
//!
//! Jellyfin uses PascalCase field names throughout.

use serde::{Deserialize, Serialize};

/// Entry of `GET /Library/VirtualFolders`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VirtualFolder {
    /// Library name as shown in the UI
    pub name: String,
    /// Root folders of the library
    #[serde(default)]
    pub locations: Vec<String>,
    /// movies, tvshows, music, ...
    pub collection_type: Option<String>,
    /// Item id of the library folder
    pub item_id: Option<String>,
}

/// Paged item list returned by `/Users/{id}/Views` and `/Users/{id}/Items`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemsResponse {
    #[serde(default)]
    pub items: Vec<BaseItem>,
    pub total_record_count: Option<u32>,
}

/// A library item (view, folder, movie, series, ...)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BaseItem {
    pub id: String,
    pub name: Option<String>,
    /// Only present when requested with `Fields=Path`
    pub path: Option<String>,
    #[serde(rename = "Type")]
    pub item_type: Option<String>,
}

/// Body of `POST /Library/Media/Updated`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaUpdateRequest {
    pub updates: Vec<MediaUpdate>,
}

/// A single changed path
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaUpdate {
    pub path: String,
    /// Created, Modified or Deleted
    pub update_type: String,
}

impl MediaUpdateRequest {
    /// Report `path` as created, which makes Jellyfin rescan it.
    pub fn created(path: &str) -> Self {
        Self {
            updates: vec![MediaUpdate {
                path: path.to_string(),
                update_type: "Created".to_string(),
            }],
        }
    }
}
