//! Adapter layer: Convert Jellyfin DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.

use super::dto;
use crate::target::Library;

/// Flatten virtual folders into one library per location.
///
/// Server order is kept: library resolution is first-match, so the order
/// here decides which library wins for nested roots. Roots get a trailing
/// `/` so `/data/movies` doesn't claim `/data/movies-4k/...`.
pub fn to_libraries(folders: Vec<dto::VirtualFolder>) -> Vec<Library> {
    folders
        .into_iter()
        .flat_map(|folder| {
            let name = folder.name;
            folder
                .locations
                .into_iter()
                .filter(|location| !location.is_empty())
                .map(move |location| Library::new(name.clone(), with_trailing_slash(location)))
        })
        .collect()
}

fn with_trailing_slash(mut path: String) -> String {
    if !path.ends_with('/') {
        path.push('/');
    }
    path
}

/// Id of the first view whose name matches `library`, ignoring case.
pub fn find_view_id(views: &dto::ItemsResponse, library: &str) -> Option<String> {
    views
        .items
        .iter()
        .find(|view| {
            view.name
                .as_deref()
                .is_some_and(|name| name.eq_ignore_ascii_case(library))
        })
        .map(|view| view.id.clone())
}

/// Id of the first item whose path is exactly `path`.
pub fn find_item_id(items: &dto::ItemsResponse, path: &str) -> Option<String> {
    items
        .items
        .iter()
        .find(|item| item.path.as_deref() == Some(path))
        .map(|item| item.id.clone())
}
