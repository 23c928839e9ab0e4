//! Configuration and YouTube Data API response shapes.

use serde::{Deserialize, Serialize};

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube catalog configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YoutubeConfig {
    /// Data API key
    pub api_key: String,

    /// API root, overridable for tests and proxies
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Region hint for keyword search
    #[serde(default)]
    pub region_code: Option<String>,

    /// Results requested per keyword search
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    /// Items requested per playlist expansion
    #[serde(default = "default_playlist_limit")]
    pub playlist_limit: u32,
}

impl YoutubeConfig {
    /// Create a configuration with default endpoints and limits.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            region_code: None,
            search_limit: default_search_limit(),
            playlist_limit: default_playlist_limit(),
        }
    }

    /// Point the client at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Bias keyword search toward a region.
    pub fn with_region(mut self, region_code: impl Into<String>) -> Self {
        self.region_code = Some(region_code.into());
        self
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_search_limit() -> u32 {
    10
}

fn default_playlist_limit() -> u32 {
    25
}

/// Generic list envelope returned by every endpoint we call.
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Error envelope (`{"error": {"code": 403, "message": "..."}}`).
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Snippet {
    pub title: String,
}

/// `videos?part=snippet` item
#[derive(Debug, Deserialize)]
pub(crate) struct VideoSnippetItem {
    pub id: String,
    pub snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VideoDetailsItem {
    pub id: String,
    pub content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentDetails {
    pub duration: String,
}

/// `search` item; `id` is an object for search results.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    pub id: SearchId,
    pub snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchId {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItem {
    pub snippet: PlaylistSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaylistSnippet {
    pub title: String,
    pub resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResourceId {
    #[serde(default)]
    pub video_id: Option<String>,
}
