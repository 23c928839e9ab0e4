//! Sona Catalog
//!
//! YouTube Data API v3 implementation of the [`sona_core::Catalog`] trait.
//!
//! # Features
//!
//! - **Batched lookups**: titles (`snippet`) and durations (`contentDetails`) for many ids per request
//! - **Keyword search**: video results only, most relevant first
//! - **Playlist expansion**: first page of a playlist, in playlist order
//! - **Link recognition**: `watch?v=`, `watch?list=`, `playlist?list=` and `youtu.be/` links
//!
//! # Example
//!
//! ```ignore
//! use sona_catalog::{YoutubeCatalog, YoutubeConfig};
//! use sona_core::Catalog;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = YoutubeCatalog::new(YoutubeConfig::new("api-key"))?;
//!
//!     let results = catalog.search("lofi hip hop").await?;
//!     for (i, track) in results.iter().enumerate() {
//!         println!("{}. {}", i + 1, track);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod duration;
mod error;
mod link;
mod types;

pub use client::YoutubeCatalog;
pub use duration::parse_iso8601_duration;
pub use error::{CatalogError, Result};
pub use link::parse_youtube_link;
pub use types::{YoutubeConfig, DEFAULT_BASE_URL};
