/// Collaborator traits consumed by the orchestrator
use crate::error::Result;
use crate::types::{ChannelId, CommunityId, MessageRef, Origin, PlaybackToken, Track};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::io::AsyncRead;

/// Audio byte stream handed to the player
pub type AudioStream = Box<dyn AsyncRead + Send + Unpin>;

/// Play counts keyed by track id
pub type RankMap = HashMap<String, u64>;

/// A catalog link recognised inside a play request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLink {
    /// Link to a single track
    Track(String),

    /// Link to a playlist
    Playlist(String),
}

/// Catalog metadata lookup
///
/// Ids missing from a response are treated as unresolved, never as an error.
/// An `Err` means the whole request failed (network, quota, malformed reply).
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Resolve display titles for a batch of ids
    async fn resolve_titles(&self, ids: &[String]) -> Result<HashMap<String, String>>;

    /// Resolve durations (seconds) for a batch of ids
    async fn resolve_durations(&self, ids: &[String]) -> Result<HashMap<String, u32>>;

    /// Keyword search, most relevant first
    async fn search(&self, keyword: &str) -> Result<Vec<Track>>;

    /// Expand a playlist into its tracks, in playlist order
    async fn resolve_playlist(&self, list_id: &str) -> Result<Vec<Track>>;

    /// Recognise a catalog link in free text
    ///
    /// Catalogs without shareable links never match.
    fn parse_link(&self, text: &str) -> Option<CatalogLink> {
        let _ = text;
        None
    }

    /// Resolve complete tracks for a batch of ids
    ///
    /// Titles are looked up first; durations are only requested for ids that
    /// produced a title. Ids missing either piece are dropped. Input order is
    /// preserved.
    async fn resolve_tracks(&self, ids: &[String]) -> Result<Vec<Track>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let titles = self.resolve_titles(ids).await?;
        let titled: Vec<String> = ids
            .iter()
            .filter(|id| titles.contains_key(*id))
            .cloned()
            .collect();
        if titled.is_empty() {
            return Ok(Vec::new());
        }

        let durations = self.resolve_durations(&titled).await?;
        Ok(titled
            .into_iter()
            .filter_map(|id| {
                let duration = *durations.get(&id)?;
                let title = titles.get(&id)?.clone();
                Some(Track::new(id, title, duration))
            })
            .collect())
    }
}

/// Lifecycle notifications raised by a voice connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake completed
    Ready,

    /// The stream attached under `token` ended on its own
    Finished {
        /// Attach the event belongs to
        token: PlaybackToken,
    },

    /// The stream attached under `token` failed mid-playback
    Failed {
        /// Attach the event belongs to
        token: PlaybackToken,
        /// Transport supplied description
        reason: String,
    },

    /// The connection was dropped by the peer or a moderator
    Disconnected,
}

/// Sink a voice connection reports its lifecycle through
#[derive(Clone)]
pub struct TransportEvents {
    notify: Arc<dyn Fn(TransportEvent) + Send + Sync>,
}

impl TransportEvents {
    /// Wrap a notification callback
    pub fn new(notify: impl Fn(TransportEvent) + Send + Sync + 'static) -> Self {
        Self {
            notify: Arc::new(notify),
        }
    }

    /// A sink that drops every event
    pub fn discard() -> Self {
        Self::new(|_| {})
    }

    /// Deliver an event
    pub fn emit(&self, event: TransportEvent) {
        (self.notify)(event);
    }
}

impl fmt::Debug for TransportEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportEvents").finish_non_exhaustive()
    }
}

/// Opens voice connections
#[async_trait]
pub trait VoiceTransport: Send + Sync {
    /// Join a voice channel
    ///
    /// Resolves once the connection is ready. Later lifecycle changes are
    /// reported through `events`.
    async fn connect(
        &self,
        channel: &ChannelId,
        events: TransportEvents,
    ) -> Result<Box<dyn VoiceConnection>>;
}

/// A live voice connection with its attached player
#[async_trait]
pub trait VoiceConnection: Send + Sync {
    /// Replace whatever is playing with `stream`
    ///
    /// Completion or failure of the stream is reported with `token`.
    async fn play(&mut self, stream: AudioStream, token: PlaybackToken) -> Result<()>;

    /// Stop the current stream without reporting a natural finish
    async fn stop(&mut self);

    /// Leave the voice channel
    async fn disconnect(&mut self) -> Result<()>;

    /// Release every resource held by the connection
    async fn destroy(&mut self);

    /// Members currently in the voice channel, the bot included
    ///
    /// `None` when the transport cannot tell.
    async fn member_count(&self) -> Option<usize>;
}

/// Audio stream acquisition
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Open an audio stream for a catalog track
    async fn open(&self, track_id: &str) -> Result<AudioStream>;
}

/// Durable storage for rank maps
#[async_trait]
pub trait RankRepository: Send + Sync {
    /// Load a community's rank map; a community never saved loads empty
    async fn load(&self, community: &CommunityId) -> Result<RankMap>;

    /// Replace a community's stored rank map
    async fn save(&self, community: &CommunityId, ranks: &RankMap) -> Result<()>;
}

/// Chat platform replies and announcements
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Reply to a command, optionally retracting the command message first
    async fn reply(&self, origin: &Origin, text: &str, retract_origin: bool) -> Result<MessageRef>;

    /// Post to a text channel
    async fn send(&self, channel: &ChannelId, text: &str) -> Result<MessageRef>;

    /// Delete a previously posted message
    async fn retract(&self, message: &MessageRef) -> Result<()>;
}
