//! Fake collaborators shared by the session tests
#![allow(dead_code)]

use async_trait::async_trait;
use sona_core::{
    AudioStream, Catalog, CatalogLink, ChannelId, CommunityId, MessageId, MessageRef, Messenger,
    Origin, PlaybackToken, RankMap, RankRepository, SonaError, StreamSource, Track,
    TransportEvent, TransportEvents, UserId, VoiceConnection, VoiceTransport,
};
use sona_playback::{spawn_session, Collaborators, PlaybackConfig, SessionHandle};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

pub const VOICE: &str = "voice";
pub const TEXT: &str = "text";

// ===== Catalog =====

/// In-memory catalog; links are `track:<id>` or `list:<id>`
#[derive(Default)]
pub struct FakeCatalog {
    tracks: Mutex<HashMap<String, Track>>,
    searches: Mutex<HashMap<String, Vec<Track>>>,
    playlists: Mutex<HashMap<String, Vec<Track>>>,
    pub failing: Mutex<bool>,
    pub title_requests: AtomicUsize,
}

impl FakeCatalog {
    pub fn add(&self, track: Track) {
        self.tracks.lock().unwrap().insert(track.id.clone(), track);
    }

    pub fn add_search(&self, keyword: &str, tracks: Vec<Track>) {
        for track in &tracks {
            self.add(track.clone());
        }
        self.searches
            .lock()
            .unwrap()
            .insert(keyword.to_string(), tracks);
    }

    pub fn add_playlist(&self, id: &str, tracks: Vec<Track>) {
        for track in &tracks {
            self.add(track.clone());
        }
        self.playlists.lock().unwrap().insert(id.to_string(), tracks);
    }

    pub fn fail(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    fn check(&self) -> sona_core::Result<()> {
        if *self.failing.lock().unwrap() {
            Err(SonaError::lookup("catalog unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn resolve_titles(&self, ids: &[String]) -> sona_core::Result<HashMap<String, String>> {
        self.title_requests.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let tracks = self.tracks.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| tracks.get(id).map(|t| (id.clone(), t.title.clone())))
            .collect())
    }

    async fn resolve_durations(&self, ids: &[String]) -> sona_core::Result<HashMap<String, u32>> {
        self.check()?;
        let tracks = self.tracks.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| tracks.get(id).map(|t| (id.clone(), t.duration_secs)))
            .collect())
    }

    async fn search(&self, keyword: &str) -> sona_core::Result<Vec<Track>> {
        self.check()?;
        Ok(self
            .searches
            .lock()
            .unwrap()
            .get(keyword)
            .cloned()
            .unwrap_or_default())
    }

    async fn resolve_playlist(&self, list_id: &str) -> sona_core::Result<Vec<Track>> {
        self.check()?;
        Ok(self
            .playlists
            .lock()
            .unwrap()
            .get(list_id)
            .cloned()
            .unwrap_or_default())
    }

    fn parse_link(&self, text: &str) -> Option<CatalogLink> {
        if let Some(id) = text.strip_prefix("track:") {
            Some(CatalogLink::Track(id.to_string()))
        } else {
            text.strip_prefix("list:")
                .map(|id| CatalogLink::Playlist(id.to_string()))
        }
    }
}

// ===== Voice transport =====

#[derive(Default)]
pub struct ConnectionLog {
    pub events: Option<TransportEvents>,
    pub channel: Option<ChannelId>,
    pub played: Vec<PlaybackToken>,
    pub stops: usize,
    pub disconnected: bool,
    pub destroyed: bool,
}

/// Voice transport whose connections record what happens to them
#[derive(Default)]
pub struct FakeTransport {
    pub connections: Mutex<Vec<Arc<Mutex<ConnectionLog>>>>,
    pub members: Arc<Mutex<Option<usize>>>,
    pub refuse: Mutex<bool>,
    /// Next `n` calls to `play` fail with a playback error
    pub failing_plays: Arc<AtomicUsize>,
}

impl FakeTransport {
    pub fn connect_count(&self) -> usize {
        self.connections.lock().unwrap().len()
    }

    fn latest(&self) -> Arc<Mutex<ConnectionLog>> {
        self.connections
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no connection was opened")
    }

    /// Token of the most recent attach
    pub fn last_token(&self) -> PlaybackToken {
        *self
            .latest()
            .lock()
            .unwrap()
            .played
            .last()
            .expect("nothing was played")
    }

    pub fn play_count(&self) -> usize {
        self.connections
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.lock().unwrap().played.len())
            .sum()
    }

    /// Raise an event on the latest connection
    pub fn emit(&self, event: TransportEvent) {
        let events = self.latest().lock().unwrap().events.clone();
        events.expect("connection has no sink").emit(event);
    }

    pub fn finish_current(&self) {
        let token = self.last_token();
        self.emit(TransportEvent::Finished { token });
    }

    pub fn fail_current(&self, reason: &str) {
        let token = self.last_token();
        self.emit(TransportEvent::Failed {
            token,
            reason: reason.to_string(),
        });
    }

    pub fn set_members(&self, members: Option<usize>) {
        *self.members.lock().unwrap() = members;
    }

    pub fn latest_log(&self) -> Arc<Mutex<ConnectionLog>> {
        self.latest()
    }
}

#[async_trait]
impl VoiceTransport for FakeTransport {
    async fn connect(
        &self,
        channel: &ChannelId,
        events: TransportEvents,
    ) -> sona_core::Result<Box<dyn VoiceConnection>> {
        if *self.refuse.lock().unwrap() {
            return Err(SonaError::connection("refused"));
        }
        let log = Arc::new(Mutex::new(ConnectionLog {
            events: Some(events),
            channel: Some(channel.clone()),
            ..ConnectionLog::default()
        }));
        self.connections.lock().unwrap().push(Arc::clone(&log));
        Ok(Box::new(FakeConnection {
            log,
            members: Arc::clone(&self.members),
            failing_plays: Arc::clone(&self.failing_plays),
        }))
    }
}

struct FakeConnection {
    log: Arc<Mutex<ConnectionLog>>,
    members: Arc<Mutex<Option<usize>>>,
    failing_plays: Arc<AtomicUsize>,
}

#[async_trait]
impl VoiceConnection for FakeConnection {
    async fn play(&mut self, _stream: AudioStream, token: PlaybackToken) -> sona_core::Result<()> {
        let fail = self
            .failing_plays
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            return Err(SonaError::playback("player rejected stream"));
        }
        self.log.lock().unwrap().played.push(token);
        Ok(())
    }

    async fn stop(&mut self) {
        self.log.lock().unwrap().stops += 1;
    }

    async fn disconnect(&mut self) -> sona_core::Result<()> {
        self.log.lock().unwrap().disconnected = true;
        Ok(())
    }

    async fn destroy(&mut self) {
        self.log.lock().unwrap().destroyed = true;
    }

    async fn member_count(&self) -> Option<usize> {
        *self.members.lock().unwrap()
    }
}

// ===== Streams =====

#[derive(Default)]
pub struct FakeStreams {
    pub broken: Mutex<HashSet<String>>,
    pub opened: Mutex<Vec<String>>,
}

impl FakeStreams {
    pub fn break_track(&self, id: &str) {
        self.broken.lock().unwrap().insert(id.to_string());
    }
}

#[async_trait]
impl StreamSource for FakeStreams {
    async fn open(&self, track_id: &str) -> sona_core::Result<AudioStream> {
        self.opened.lock().unwrap().push(track_id.to_string());
        if self.broken.lock().unwrap().contains(track_id) {
            return Err(SonaError::stream(format!("{} is unavailable", track_id)));
        }
        Ok(Box::new(tokio::io::empty()))
    }
}

// ===== Rank storage =====

#[derive(Default)]
pub struct MemoryRanks {
    pub stored: Mutex<HashMap<CommunityId, RankMap>>,
    pub saves: AtomicUsize,
}

impl MemoryRanks {
    pub fn seed(&self, community: &str, entries: &[(&str, u64)]) {
        self.stored.lock().unwrap().insert(
            CommunityId::new(community),
            entries
                .iter()
                .map(|(id, count)| ((*id).to_string(), *count))
                .collect(),
        );
    }

    pub fn stored(&self, community: &str) -> RankMap {
        self.stored
            .lock()
            .unwrap()
            .get(&CommunityId::new(community))
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl RankRepository for MemoryRanks {
    async fn load(&self, community: &CommunityId) -> sona_core::Result<RankMap> {
        Ok(self
            .stored
            .lock()
            .unwrap()
            .get(community)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, community: &CommunityId, ranks: &RankMap) -> sona_core::Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.stored
            .lock()
            .unwrap()
            .insert(community.clone(), ranks.clone());
        Ok(())
    }
}

// ===== Messaging =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Posted {
    Reply {
        user: UserId,
        text: String,
        retract_origin: bool,
    },
    Send {
        channel: ChannelId,
        text: String,
    },
    Retract(MessageRef),
}

#[derive(Default)]
pub struct FakeMessenger {
    pub log: Mutex<Vec<Posted>>,
    next_id: AtomicU64,
}

impl FakeMessenger {
    pub fn posted(&self) -> Vec<Posted> {
        self.log.lock().unwrap().clone()
    }

    /// Texts of every reply and announcement, in order
    pub fn texts(&self) -> Vec<String> {
        self.posted()
            .into_iter()
            .filter_map(|p| match p {
                Posted::Reply { text, .. } | Posted::Send { text, .. } => Some(text),
                Posted::Retract(_) => None,
            })
            .collect()
    }

    pub fn retracted(&self) -> Vec<MessageRef> {
        self.posted()
            .into_iter()
            .filter_map(|p| match p {
                Posted::Retract(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn any_text_contains(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    fn next_ref(&self, channel: &ChannelId) -> MessageRef {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        MessageRef::new(channel.clone(), MessageId::new(format!("m{}", id)))
    }
}

#[async_trait]
impl Messenger for FakeMessenger {
    async fn reply(&self, origin: &Origin, text: &str, retract_origin: bool) -> sona_core::Result<MessageRef> {
        self.log.lock().unwrap().push(Posted::Reply {
            user: origin.user.clone(),
            text: text.to_string(),
            retract_origin,
        });
        Ok(self.next_ref(&origin.text_channel))
    }

    async fn send(&self, channel: &ChannelId, text: &str) -> sona_core::Result<MessageRef> {
        self.log.lock().unwrap().push(Posted::Send {
            channel: channel.clone(),
            text: text.to_string(),
        });
        Ok(self.next_ref(channel))
    }

    async fn retract(&self, message: &MessageRef) -> sona_core::Result<()> {
        self.log
            .lock()
            .unwrap()
            .push(Posted::Retract(message.clone()));
        Ok(())
    }
}

// ===== Harness =====

pub struct Harness {
    pub catalog: Arc<FakeCatalog>,
    pub transport: Arc<FakeTransport>,
    pub streams: Arc<FakeStreams>,
    pub ranks: Arc<MemoryRanks>,
    pub messenger: Arc<FakeMessenger>,
}

impl Harness {
    pub fn new() -> Self {
        let transport = FakeTransport::default();
        transport.set_members(Some(2));
        Self {
            catalog: Arc::new(FakeCatalog::default()),
            transport: Arc::new(transport),
            streams: Arc::new(FakeStreams::default()),
            ranks: Arc::new(MemoryRanks::default()),
            messenger: Arc::new(FakeMessenger::default()),
        }
    }

    pub fn deps(&self) -> Collaborators {
        Collaborators {
            catalog: self.catalog.clone(),
            transport: self.transport.clone(),
            streams: self.streams.clone(),
            ranks: self.ranks.clone(),
            messenger: self.messenger.clone(),
        }
    }

    pub fn start(&self, config: PlaybackConfig) -> (SessionHandle, JoinHandle<()>) {
        spawn_session(CommunityId::new("guild"), config, self.deps())
    }
}

pub fn track(id: &str, secs: u32) -> Track {
    Track::new(id, format!("Song {}", id.to_uppercase()), secs)
}

/// A user sitting in the voice channel
pub fn listener(user: &str) -> Origin {
    Origin::new(UserId::new(user), ChannelId::new(TEXT))
        .in_voice(ChannelId::new(VOICE))
        .with_message(MessageId::new(format!("cmd-{}", user)))
}

/// A user typing from outside voice
pub fn outsider(user: &str) -> Origin {
    Origin::new(UserId::new(user), ChannelId::new(TEXT))
}
