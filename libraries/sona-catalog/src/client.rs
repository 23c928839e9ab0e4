//! YouTube Data API client.

use crate::duration::parse_iso8601_duration;
use crate::error::{CatalogError, Result};
use crate::link::parse_youtube_link;
use crate::types::{
    ErrorResponse, ListResponse, PlaylistItem, SearchItem, VideoDetailsItem, VideoSnippetItem,
    YoutubeConfig,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use sona_core::{Catalog, CatalogLink, Track};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// The videos endpoint accepts at most 50 ids per call
const VIDEO_BATCH_LIMIT: usize = 50;

/// Catalog backed by the YouTube Data API v3.
///
/// # Example
///
/// ```ignore
/// use sona_catalog::{YoutubeCatalog, YoutubeConfig};
/// use sona_core::Catalog;
///
/// let catalog = YoutubeCatalog::new(YoutubeConfig::new("api-key"))?;
/// let tracks = catalog.resolve_tracks(&["dQw4w9WgXcQ".to_string()]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct YoutubeCatalog {
    http: Client,
    config: YoutubeConfig,
}

impl YoutubeCatalog {
    /// Create a new catalog client with the given configuration.
    pub fn new(config: YoutubeConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(CatalogError::InvalidConfig("API key cannot be empty".into()));
        }

        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CatalogError::InvalidConfig(
                "Base URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(format!("Sona/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config: YoutubeConfig { base_url, ..config },
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &YoutubeConfig {
        &self.config
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}", self.config.base_url, endpoint);
        debug!(url = %url, "Catalog request");

        let response = self
            .http
            .get(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => status.canonical_reason().unwrap_or("Unknown error").to_string(),
            };
            warn!(endpoint, status = status.as_u16(), message = %message, "Catalog request rejected");
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(format!("Failed to parse {} response: {}", endpoint, e)))
    }

    /// Titles for a batch of ids; ids the API omits are absent from the map.
    pub async fn video_titles(&self, ids: &[String]) -> Result<HashMap<String, String>> {
        let mut titles = HashMap::with_capacity(ids.len());
        for chunk in ids.chunks(VIDEO_BATCH_LIMIT) {
            let body: ListResponse<VideoSnippetItem> = self
                .get("videos", &[("part", "snippet".into()), ("id", chunk.join(","))])
                .await?;
            titles.extend(body.items.into_iter().map(|item| (item.id, item.snippet.title)));
        }
        log_missing("title", ids, &titles);
        Ok(titles)
    }

    /// Durations in seconds for a batch of ids.
    pub async fn video_durations(&self, ids: &[String]) -> Result<HashMap<String, u32>> {
        let mut durations = HashMap::with_capacity(ids.len());
        for chunk in ids.chunks(VIDEO_BATCH_LIMIT) {
            let body: ListResponse<VideoDetailsItem> = self
                .get("videos", &[("part", "contentDetails".into()), ("id", chunk.join(","))])
                .await?;
            for item in body.items {
                match parse_iso8601_duration(&item.content_details.duration) {
                    Some(secs) => {
                        durations.insert(item.id, secs);
                    }
                    None => warn!(
                        id = %item.id,
                        duration = %item.content_details.duration,
                        "Unparseable duration"
                    ),
                }
            }
        }
        log_missing("duration", ids, &durations);
        Ok(durations)
    }

    /// Attach durations to `(id, title)` pairs, dropping any without one.
    async fn complete(&self, entries: Vec<(String, String)>) -> Result<Vec<Track>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = entries.iter().map(|(id, _)| id.clone()).collect();
        let durations = self.video_durations(&ids).await?;
        Ok(entries
            .into_iter()
            .filter_map(|(id, title)| {
                let secs = *durations.get(&id)?;
                Some(Track::new(id, title, secs))
            })
            .collect())
    }
}

fn log_missing<V>(field: &str, ids: &[String], found: &HashMap<String, V>) {
    for id in ids.iter().filter(|id| !found.contains_key(*id)) {
        debug!(id = %id, field, "Id did not resolve");
    }
}

#[async_trait]
impl Catalog for YoutubeCatalog {
    async fn resolve_titles(&self, ids: &[String]) -> sona_core::Result<HashMap<String, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(self.video_titles(ids).await?)
    }

    async fn resolve_durations(&self, ids: &[String]) -> sona_core::Result<HashMap<String, u32>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(self.video_durations(ids).await?)
    }

    async fn search(&self, keyword: &str) -> sona_core::Result<Vec<Track>> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("type", "video".to_string()),
            ("q", keyword.to_string()),
            ("maxResults", self.config.search_limit.to_string()),
        ];
        if let Some(region) = &self.config.region_code {
            params.push(("regionCode", region.clone()));
        }

        let body: ListResponse<SearchItem> = self.get("search", &params).await?;
        let entries: Vec<(String, String)> = body
            .items
            .into_iter()
            .filter_map(|item| Some((item.id.video_id?, item.snippet.title)))
            .collect();

        debug!(keyword, hits = entries.len(), "Search complete");
        Ok(self.complete(entries).await?)
    }

    async fn resolve_playlist(&self, list_id: &str) -> sona_core::Result<Vec<Track>> {
        let params = [
            ("part", "snippet".to_string()),
            ("playlistId", list_id.to_string()),
            ("maxResults", self.config.playlist_limit.to_string()),
        ];

        let body: ListResponse<PlaylistItem> = match self.get("playlistItems", &params).await {
            Ok(body) => body,
            // Unknown or private playlists expand to nothing
            Err(CatalogError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let entries: Vec<(String, String)> = body
            .items
            .into_iter()
            .filter_map(|item| Some((item.snippet.resource_id.video_id?, item.snippet.title)))
            .collect();

        debug!(list_id, items = entries.len(), "Playlist expanded");
        Ok(self.complete(entries).await?)
    }

    fn parse_link(&self, text: &str) -> Option<CatalogLink> {
        parse_youtube_link(text)
    }
}
