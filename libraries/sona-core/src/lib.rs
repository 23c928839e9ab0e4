//! Sona Core
//!
//! Platform-agnostic types, collaborator traits, and error handling shared by
//! every Sona crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `PlayRequest`, `Origin`, and the id newtypes
//! - **Collaborator Traits**: `Catalog`, `VoiceTransport`, `VoiceConnection`,
//!   `StreamSource`, `RankRepository`, `Messenger`
//! - **Error Handling**: Unified `SonaError` and `Result` types
//!
//! The orchestrator in `sona-playback` only talks to the outside world through
//! these traits, so chat platforms, voice transports and catalogs can be swapped
//! without touching the state machine.
//!
//! # Example
//!
//! ```rust
//! use sona_core::types::{ChannelId, Destination, PlayRequest, Track};
//!
//! let track = Track::new("dQw4w9WgXcQ", "Never Gonna Give You Up", 213);
//! assert_eq!(track.duration_label(), "3:33");
//!
//! let destination = Destination::new(ChannelId::new("voice-1"), ChannelId::new("text-1"));
//! let request = PlayRequest::new(track, destination);
//! assert_eq!(request.error_count, 0);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SonaError};
pub use traits::{
    AudioStream, Catalog, CatalogLink, Messenger, RankMap, RankRepository, StreamSource, TransportEvent,
    TransportEvents, VoiceConnection, VoiceTransport,
};
pub use types::{
    ChannelId, CommunityId, Destination, MessageId, MessageRef, Origin, PlayRequest,
    PlaybackToken, Track, UserId,
};
