//! Sona Storage
//!
//! Durable storage for per-community rank maps.
//!
//! Each community is stored as one flat JSON object mapping track id to play
//! count, in `{root}/{prefix}_{community}.json`. Writes go through a temporary
//! file and a rename so a crash mid-flush never leaves a truncated map behind.
//!
//! # Example
//!
//! ```rust,no_run
//! use sona_core::{CommunityId, RankRepository};
//! use sona_storage::JsonRankRepository;
//!
//! # async fn example() -> sona_core::Result<()> {
//! let repository = JsonRankRepository::new("./data/ranks", "song_rank");
//! let community = CommunityId::new("1234");
//!
//! let mut ranks = repository.load(&community).await?;
//! *ranks.entry("dQw4w9WgXcQ".to_string()).or_insert(0) += 1;
//! repository.save(&community, &ranks).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod ranks;

pub use error::{Result, StorageError};
pub use ranks::JsonRankRepository;
