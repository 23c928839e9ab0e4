//! Sona - Playback Orchestration
//!
//! Per-community playback for a chat bot.
//!
//! This crate provides:
//! - A FIFO queue of play requests with shuffle
//! - Per-user pending search results
//! - A bounded history of recently played tracks
//! - Play counts credited on natural completion
//! - Weighted random recommendations drawn from play counts
//! - A playback state machine with retries, skip, idle disconnect and
//!   auto-recommend mode
//!
//! # Architecture
//!
//! Each community gets one [`PlaybackSession`] running as its own tokio
//! task. Commands, transport events, idle timeouts and periodic ticks all
//! arrive through the session's mailbox and are handled one at a time.
//! The chat platform, voice transport, catalog, audio streams and storage
//! are reached through the traits in `sona-core`.
//!
//! # Example
//!
//! ```rust,no_run
//! use sona_core::{ChannelId, CommunityId, Origin, UserId};
//! use sona_playback::{Collaborators, PlaybackConfig, SessionRegistry};
//!
//! # async fn run(deps: Collaborators) -> sona_playback::Result<()> {
//! let registry = SessionRegistry::new(PlaybackConfig::default(), deps);
//! let session = registry.session(&CommunityId::new("guild"));
//!
//! let origin = Origin::new(UserId::new("user"), ChannelId::new("text"))
//!     .in_voice(ChannelId::new("voice"));
//! session.play(origin.clone(), "lofi hip hop").await?;
//! session.play(origin, "1").await?;
//!
//! registry.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod error;
pub mod events;
pub mod format;
pub mod history;
pub mod idle;
pub mod queue;
pub mod ranks;
pub mod registry;
pub mod sampler;
pub mod search;
pub mod session;
pub mod types;

pub use command::{Command, CommandOutcome, PlayRequestKind};
pub use error::{PlaybackError, Result, UserInputError};
pub use events::SessionMessage;
pub use history::BoundedHistory;
pub use idle::IdleTimer;
pub use queue::Queue;
pub use ranks::RankStore;
pub use registry::{spawn_session, SessionHandle, SessionRegistry};
pub use sampler::RecommendationSampler;
pub use search::{SearchPick, SearchRegistry, SearchResultSet};
pub use session::{Collaborators, PlaybackSession};
pub use types::{PlaybackConfig, SamplerConfig, SessionSnapshot, SessionState};
