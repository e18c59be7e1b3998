//! Jellyfin HTTP client
//!
//! Handles communication with the Jellyfin server API.
//! See: https://api.jellyfin.org/
//!
//! Every request is authenticated with the `X-Emby-Token` header. Status codes
//! are mapped so callers can tell a server that is down (404/5xx, transport
//! errors) from one that rejects us (401) or misbehaves (anything else).

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::{adapter, dto};
use crate::target::{Library, TargetError};

/// User agent string
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Upper bound for a single API call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Jellyfin API client
#[derive(Debug, Clone)]
pub struct JellyfinClient {
    http_client: reqwest::Client,
    base_url: String,
    token: String,
}

impl JellyfinClient {
    /// Create a client for the server at `base_url`
    ///
    /// The client is configured to:
    /// - Accept gzip-compressed responses
    /// - Send a User-Agent header identifying the application
    /// - Give up on any single request after 30 seconds
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, TargetError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TargetError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// List every library location, in server order
    pub async fn libraries(&self) -> Result<Vec<Library>, TargetError> {
        let folders: Vec<dto::VirtualFolder> = self
            .get_json(self.http_client.get(self.url("/Library/VirtualFolders")))
            .await?;
        Ok(adapter::to_libraries(folders))
    }

    /// Check that the server answers and accepts the token
    pub async fn available(&self) -> Result<(), TargetError> {
        self.send(self.http_client.get(self.url("/System/Info")))
            .await
            .map(drop)
    }

    /// Resolve the view id of a library for a user
    pub async fn view_id(&self, user_id: &str, library: &str) -> Result<String, TargetError> {
        let url = self.url(&format!("/Users/{}/Views", urlencoding::encode(user_id)));
        let views: dto::ItemsResponse = self.get_json(self.http_client.get(url)).await?;

        adapter::find_view_id(&views, library)
            .ok_or_else(|| TargetError::ViewNotFound(library.to_string()))
    }

    /// Find the item inside a view whose path equals `path` exactly
    pub async fn find_item_id_by_path(
        &self,
        user_id: &str,
        view_id: &str,
        path: &str,
    ) -> Result<String, TargetError> {
        let url = self.url(&format!("/Users/{}/Items", urlencoding::encode(user_id)));
        let request = self.http_client.get(url).query(&[
            ("ParentId", view_id),
            ("Recursive", "true"),
            ("Fields", "Path"),
            ("EnableImages", "false"),
            ("EnableUserData", "false"),
        ]);
        let items: dto::ItemsResponse = self.get_json(request).await?;

        adapter::find_item_id(&items, path).ok_or_else(|| TargetError::ItemNotFound(path.to_string()))
    }

    /// Refresh an item and everything below it
    pub async fn refresh_item(&self, item_id: &str) -> Result<(), TargetError> {
        let url = self.url(&format!("/Items/{}/Refresh", urlencoding::encode(item_id)));
        let request = self.http_client.post(url).query(&[
            ("Recursive", "true"),
            ("MetadataRefreshMode", "Default"),
            ("ImageRefreshMode", "Default"),
            ("ReplaceAllMetadata", "false"),
            ("ReplaceAllImages", "false"),
        ]);
        self.send(request).await.map(drop)
    }

    /// Notify the server that `path` changed, triggering a library scan
    pub async fn scan(&self, path: &str) -> Result<(), TargetError> {
        let request = self
            .http_client
            .post(self.url("/Library/Media/Updated"))
            .json(&dto::MediaUpdateRequest::created(path));
        self.send(request).await.map(drop)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send an authenticated request and reject non-success statuses
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, TargetError> {
        let response = request
            .header("X-Emby-Token", &self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| TargetError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, TargetError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| TargetError::Parse(e.to_string()))
    }
}

/// Map a non-success status to an error
fn status_error(status: StatusCode) -> TargetError {
    let text = format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );

    match status {
        StatusCode::UNAUTHORIZED => TargetError::Unauthorized(text),
        StatusCode::NOT_FOUND
        | StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => TargetError::Unavailable(text),
        _ => TargetError::Fatal(text),
    }
}
