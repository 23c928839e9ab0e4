//! Per-community playback state machine
//!
//! A [`PlaybackSession`] owns everything about one community's playback:
//! the queue, play history, play counts, pending searches, the voice
//! connection and the idle timer. It runs as a single task draining a
//! mailbox of [`SessionMessage`]s, so transitions never overlap.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──enqueue──▶ Connecting ──ready──▶ Playing ──finished──▶ (next)
//!                                          │  ▲
//!                                   failed │  │ re-attach
//!                                          ▼  │
//!                                        Retrying
//!
//! (next) with nothing queued ──▶ IdlePendingDisconnect ──timeout──▶ Disconnected
//! ```
//!
//! Every attach gets a fresh [`PlaybackToken`]; transport events for any
//! other token are ignored. Events are also tagged with the connection
//! they came from so a released connection cannot reach the session.

use crate::command::{Command, CommandOutcome, PlayRequestKind};
use crate::error::{Result, UserInputError};
use crate::events::SessionMessage;
use crate::format;
use crate::history::BoundedHistory;
use crate::idle::IdleTimer;
use crate::queue::Queue;
use crate::ranks::RankStore;
use crate::sampler::RecommendationSampler;
use crate::search::{SearchRegistry, SearchResultSet};
use crate::types::{PlaybackConfig, SessionSnapshot, SessionState};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sona_core::{
    Catalog, ChannelId, CommunityId, Destination, MessageRef, Messenger, Origin, PlayRequest,
    PlaybackToken, RankRepository, SonaError, StreamSource, Track, TransportEvent,
    TransportEvents, VoiceConnection, VoiceTransport,
};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Entries shown by the rank report
const RANK_REPORT_SIZE: usize = 50;

type CommandResult = std::result::Result<CommandOutcome, UserInputError>;

/// External services a session talks to
#[derive(Clone)]
pub struct Collaborators {
    pub catalog: Arc<dyn Catalog>,
    pub transport: Arc<dyn VoiceTransport>,
    pub streams: Arc<dyn StreamSource>,
    pub ranks: Arc<dyn RankRepository>,
    pub messenger: Arc<dyn Messenger>,
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// Result of trying to put one request on air
enum Render {
    Playing,
    Dropped,
    Disconnected,
}

/// One community's playback state machine
pub struct PlaybackSession {
    community: CommunityId,
    config: PlaybackConfig,
    deps: Collaborators,

    /// Own mailbox, for timer firings and transport events
    mailbox: mpsc::UnboundedSender<SessionMessage>,

    sampler: RecommendationSampler,
    queue: Queue,
    history: BoundedHistory,
    ranks: RankStore,
    searches: SearchRegistry,
    idle: IdleTimer,

    state: SessionState,
    current: Option<PlayRequest>,
    connection: Option<Box<dyn VoiceConnection>>,
    connection_id: u64,
    token: PlaybackToken,
    auto_recommend: bool,

    /// Where auto-recommended tracks go
    last_destination: Option<Destination>,

    /// Requests dropped in a row since the last successful attach
    consecutive_drops: u32,

    rng: StdRng,
}

impl PlaybackSession {
    pub fn new(
        community: CommunityId,
        config: PlaybackConfig,
        deps: Collaborators,
        mailbox: mpsc::UnboundedSender<SessionMessage>,
    ) -> Self {
        Self {
            community,
            sampler: RecommendationSampler::new(config.sampler.clone()),
            history: BoundedHistory::new(config.history_size),
            config,
            deps,
            mailbox,
            queue: Queue::new(),
            ranks: RankStore::new(),
            searches: SearchRegistry::new(),
            idle: IdleTimer::new(),
            state: SessionState::Idle,
            current: None,
            connection: None,
            connection_id: 0,
            token: PlaybackToken::default(),
            auto_recommend: false,
            last_destination: None,
            consecutive_drops: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a fixed random source
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn community(&self) -> &CommunityId {
        &self.community
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Drain the mailbox until shutdown
    ///
    /// Play counts are loaded first. Between messages the session flushes
    /// play counts and checks whether anyone is left in the voice channel.
    pub async fn run(mut self, mut mailbox: mpsc::UnboundedReceiver<SessionMessage>) {
        self.load_ranks().await;

        let flush_every = self.config.rank_flush_interval().max(Duration::from_secs(1));
        let mut flush = interval_at(Instant::now() + flush_every, flush_every);
        flush.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let check_every = self
            .config
            .occupancy_check_interval()
            .max(Duration::from_secs(1));
        let mut occupancy = interval_at(Instant::now() + check_every, check_every);
        occupancy.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                message = mailbox.recv() => match message {
                    Some(SessionMessage::Shutdown(done)) => {
                        self.shutdown().await;
                        let _ = done.send(());
                        break;
                    }
                    Some(message) => self.handle(message).await,
                    None => {
                        self.shutdown().await;
                        break;
                    }
                },
                _ = flush.tick() => self.flush_ranks().await,
                _ = occupancy.tick() => self.check_occupancy().await,
            }
        }

        debug!(community = %self.community, "Session task finished");
    }

    /// Process one message
    pub async fn handle(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::Command { command, reply } => {
                let result = self.execute(command).await;
                let _ = reply.send(result);
            }
            SessionMessage::Transport { connection, event } => {
                self.on_transport(connection, event).await;
            }
            SessionMessage::IdleTimeout { generation } => self.on_idle_timeout(generation).await,
            SessionMessage::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            SessionMessage::Flush(done) => {
                self.flush_ranks().await;
                let _ = done.send(());
            }
            SessionMessage::Shutdown(done) => {
                self.shutdown().await;
                let _ = done.send(());
            }
        }
    }

    /// Run a user command
    ///
    /// Rejected commands are replied to the user with the reason and
    /// returned as [`crate::PlaybackError::UserInput`].
    pub async fn execute(&mut self, command: Command) -> Result<CommandOutcome> {
        debug!(community = %self.community, command = command.name(), "Command received");
        let origin = command.origin().clone();

        let result = match command {
            Command::Play { origin, text } => self.play(&origin, &text).await,
            Command::Skip { origin } => self.skip(&origin).await,
            Command::ListQueue { origin } => self.list_queue(&origin).await,
            Command::SampleAndEnqueue { origin, count } => {
                self.sample_and_enqueue(&origin, count).await
            }
            Command::RankReport { origin } => self.rank_report(&origin).await,
            Command::ToggleAutoRecommend { origin } => self.toggle_auto_recommend(&origin).await,
            Command::ShuffleQueue { origin } => self.shuffle_queue(&origin).await,
        };

        match result {
            Ok(outcome) => Ok(outcome),
            Err(rejection) => {
                info!(
                    community = %self.community,
                    user = %origin.user,
                    reason = %rejection,
                    "Command rejected"
                );
                self.reply(&origin, &rejection.to_string(), false).await;
                Err(rejection.into())
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            current: self.current.clone(),
            queue: self.queue.peek_all().into_iter().cloned().collect(),
            history: self.history.iter().map(str::to_string).collect(),
            play_counts: self.ranks.to_map(),
            auto_recommend: self.auto_recommend,
            idle_timer_armed: self.idle.is_armed(),
            connected: self.connection.is_some(),
            token: self.token,
        }
    }

    // ===== Commands =====

    async fn play(&mut self, origin: &Origin, text: &str) -> CommandResult {
        let destination = origin
            .destination()
            .ok_or(UserInputError::NotInVoiceChannel)?;

        let tracks = match PlayRequestKind::classify(text, self.deps.catalog.as_ref()) {
            PlayRequestKind::Pick(index) => {
                let pick = self.searches.resolve(&origin.user, index)?;
                if let Some(message) = &pick.message {
                    self.retract(message).await;
                }
                vec![pick.track]
            }
            PlayRequestKind::Track(id) => {
                let tracks = self.lookup_tracks(&id).await;
                if tracks.is_empty() {
                    return Err(UserInputError::TrackUnavailable);
                }
                tracks
            }
            PlayRequestKind::Playlist(id) => {
                let tracks = match self.deps.catalog.resolve_playlist(&id).await {
                    Ok(tracks) => tracks,
                    Err(e) => {
                        warn!(community = %self.community, list = %id, error = %e, "Playlist lookup failed");
                        Vec::new()
                    }
                };
                if tracks.is_empty() {
                    return Err(UserInputError::PlaylistUnavailable);
                }
                tracks
            }
            PlayRequestKind::Search(keyword) => return self.search(origin, keyword).await,
        };

        let text = match tracks.as_slice() {
            [track] => format!("Queued {}", track),
            many => format!("Queued {} tracks", many.len()),
        };
        self.reply(origin, &text, true).await;

        self.enqueue(destination, tracks.clone());
        self.start_if_idle().await;
        Ok(CommandOutcome::Enqueued(tracks))
    }

    async fn search(&mut self, origin: &Origin, keyword: String) -> CommandResult {
        // Any new search retires the previous listing, even one that finds nothing
        if let Some(previous) = self.searches.evict(&origin.user) {
            if let Some(message) = &previous.message {
                self.retract(message).await;
            }
        }

        let tracks = match self.deps.catalog.search(&keyword).await {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!(community = %self.community, keyword = %keyword, error = %e, "Search failed");
                Vec::new()
            }
        };
        if tracks.is_empty() {
            return Err(UserInputError::NoSearchResults(keyword));
        }

        let listing = format::search_listing(&keyword, &tracks);
        let message = self.reply(origin, &listing, false).await;
        let count = tracks.len();

        let set = SearchResultSet::new(tracks, origin.text_channel.clone(), message);
        self.searches.record(origin.user.clone(), set);

        Ok(CommandOutcome::SearchListed(count))
    }

    async fn skip(&mut self, origin: &Origin) -> CommandResult {
        let request = self.current.take().ok_or(UserInputError::NothingPlaying)?;

        if let Some(connection) = self.connection.as_mut() {
            connection.stop().await;
        }
        // Whatever the stopped stream reports from here on is stale
        self.token = self.token.next();

        info!(community = %self.community, track = %request.track.id, "Skipped");
        self.reply(origin, &format!("Skipped {}", request.track), true)
            .await;

        self.advance().await;
        Ok(CommandOutcome::Skipped(request.track))
    }

    async fn list_queue(&mut self, origin: &Origin) -> CommandResult {
        let text = format::queue_listing(&self.queue.peek_all());
        self.reply(origin, &text, true).await;
        Ok(CommandOutcome::Listed(self.queue.len()))
    }

    async fn sample_and_enqueue(&mut self, origin: &Origin, count: Option<usize>) -> CommandResult {
        let destination = origin
            .destination()
            .ok_or(UserInputError::NotInVoiceChannel)?;
        let count = count.unwrap_or(self.config.sample_count);
        if count == 0 {
            return Err(UserInputError::InvalidCount);
        }
        if self.ranks.is_empty() {
            return Err(UserInputError::EmptyRankData);
        }

        let tracks = self.draw(count).await;
        info!(
            community = %self.community,
            requested = count,
            drawn = tracks.len(),
            "Recommendations queued"
        );
        self.reply(
            origin,
            &format!("Added {} recommended tracks", tracks.len()),
            true,
        )
        .await;

        if !tracks.is_empty() {
            self.enqueue(destination, tracks.clone());
            self.start_if_idle().await;
        }
        Ok(CommandOutcome::Enqueued(tracks))
    }

    async fn rank_report(&mut self, origin: &Origin) -> CommandResult {
        if self.ranks.is_empty() {
            return Err(UserInputError::EmptyRankData);
        }

        let top: Vec<(String, u64)> = self
            .ranks
            .top(RANK_REPORT_SIZE)
            .into_iter()
            .map(|(id, count)| (id.to_string(), count))
            .collect();
        let ids: Vec<String> = top.iter().map(|(id, _)| id.clone()).collect();

        let titles = match self.deps.catalog.resolve_titles(&ids).await {
            Ok(titles) => titles,
            Err(e) => {
                warn!(community = %self.community, error = %e, "Title lookup for rank report failed");
                HashMap::new()
            }
        };
        let entries: Vec<(usize, String, u64)> = top
            .into_iter()
            .enumerate()
            .filter_map(|(i, (id, count))| {
                titles.get(&id).map(|title| (i + 1, title.clone(), count))
            })
            .collect();

        self.reply(origin, &format::rank_report(&entries), true)
            .await;
        Ok(CommandOutcome::Reported(entries.len()))
    }

    async fn toggle_auto_recommend(&mut self, origin: &Origin) -> CommandResult {
        self.auto_recommend = !self.auto_recommend;
        info!(community = %self.community, enabled = self.auto_recommend, "Auto recommend toggled");

        let text = if self.auto_recommend {
            "Auto recommend is on"
        } else {
            "Auto recommend is off"
        };
        self.reply(origin, text, true).await;

        if self.auto_recommend && self.current.is_none() {
            if let Some(destination) = origin.destination() {
                self.last_destination = Some(destination);
            }
            if self.last_destination.is_some() {
                self.idle.disarm();
                self.advance().await;
            }
        }

        Ok(CommandOutcome::AutoRecommend(self.auto_recommend))
    }

    async fn shuffle_queue(&mut self, origin: &Origin) -> CommandResult {
        self.queue.shuffle(&mut self.rng);
        let count = self.queue.len();
        self.reply(origin, &format!("Shuffled {} queued tracks", count), true)
            .await;
        Ok(CommandOutcome::Shuffled(count))
    }

    // ===== Transitions =====

    fn enqueue(&mut self, destination: Destination, tracks: Vec<Track>) {
        self.queue.extend(
            tracks
                .into_iter()
                .map(|track| PlayRequest::new(track, destination.clone())),
        );
        self.last_destination = Some(destination);
    }

    /// After a command enqueued something
    async fn start_if_idle(&mut self) {
        self.idle.disarm();
        if self.current.is_none() {
            self.advance().await;
        }
    }

    /// Put the next request on air, or go idle
    async fn advance(&mut self) {
        self.current = None;

        loop {
            let request = match self.next_request().await {
                Some(request) => request,
                None => {
                    self.enter_idle();
                    return;
                }
            };

            match self.render(request).await {
                Render::Dropped => continue,
                Render::Playing | Render::Disconnected => return,
            }
        }
    }

    /// Queue front, else one recommendation in auto mode
    async fn next_request(&mut self) -> Option<PlayRequest> {
        if let Some(request) = self.queue.dequeue_next() {
            return Some(request);
        }
        if !self.auto_recommend {
            return None;
        }
        if self.consecutive_drops >= self.config.max_consecutive_drops {
            self.pause_recommendations().await;
            return None;
        }

        let destination = self.last_destination.clone()?;
        let track = self.draw(1).await.into_iter().next()?;
        debug!(community = %self.community, track = %track.id, "Auto recommend picked a track");
        Some(PlayRequest::new(track, destination))
    }

    /// Attach `request`, retrying attach failures
    async fn render(&mut self, mut request: PlayRequest) -> Render {
        loop {
            if let Err(e) = self.ensure_connection(&request.destination).await {
                error!(
                    community = %self.community,
                    channel = %request.destination.voice_channel,
                    error = %e,
                    "Failed to join voice channel"
                );
                self.announce(
                    &request.destination.text_channel,
                    "Could not join the voice channel",
                )
                .await;
                self.force_disconnect("connection failed").await;
                return Render::Disconnected;
            }

            match self.attach(&request).await {
                Ok(()) => {
                    self.idle.disarm();
                    self.consecutive_drops = 0;
                    self.state = SessionState::Playing;
                    self.last_destination = Some(request.destination.clone());

                    info!(
                        community = %self.community,
                        track = %request.track.id,
                        token = %self.token,
                        attempt = request.error_count,
                        "Now playing"
                    );
                    let channel = request.destination.text_channel.clone();
                    let text = format!("Now playing {}", request.track);
                    self.current = Some(request);
                    self.announce(&channel, &text).await;
                    return Render::Playing;
                }
                Err(e) if e.is_connection() => {
                    error!(community = %self.community, error = %e, "Voice connection lost while attaching");
                    self.force_disconnect("connection lost").await;
                    return Render::Disconnected;
                }
                Err(e) => match self.retry_or_drop(request, &e.to_string()).await {
                    Some(retry) => request = retry,
                    None => return Render::Dropped,
                },
            }
        }
    }

    async fn attach(&mut self, request: &PlayRequest) -> sona_core::Result<()> {
        let stream = self.deps.streams.open(&request.track.id).await?;

        let token = self.token.next();
        self.token = token;

        let connection = self
            .connection
            .as_mut()
            .ok_or_else(|| SonaError::connection("no voice connection"))?;
        connection.play(stream, token).await
    }

    /// Count a failure against `request`; `Some` means play it again
    async fn retry_or_drop(&mut self, mut request: PlayRequest, reason: &str) -> Option<PlayRequest> {
        let max = self.config.max_retries;

        if request.error_count < max {
            request.error_count += 1;
            self.state = SessionState::Retrying;
            warn!(
                community = %self.community,
                track = %request.track.id,
                attempt = request.error_count,
                reason,
                "Playback failed, retrying"
            );
            let text = format!(
                "Playback of {} failed, retrying ({}/{})",
                request.track.title, request.error_count, max
            );
            self.announce(&request.destination.text_channel, &text).await;
            Some(request)
        } else {
            self.consecutive_drops += 1;
            warn!(
                community = %self.community,
                track = %request.track.id,
                reason,
                "Playback failed too often, dropping"
            );
            let text = format!("Skipping {} after repeated playback failures", request.track.title);
            self.announce(&request.destination.text_channel, &text).await;
            None
        }
    }

    async fn ensure_connection(&mut self, destination: &Destination) -> sona_core::Result<()> {
        if self.connection.is_some() {
            return Ok(());
        }

        self.state = SessionState::Connecting;
        self.connection_id += 1;
        let connection_id = self.connection_id;
        let mailbox = self.mailbox.clone();
        let events = TransportEvents::new(move |event| {
            let _ = mailbox.send(SessionMessage::Transport {
                connection: connection_id,
                event,
            });
        });

        info!(
            community = %self.community,
            channel = %destination.voice_channel,
            "Joining voice channel"
        );
        let connection = self
            .deps
            .transport
            .connect(&destination.voice_channel, events)
            .await?;
        self.connection = Some(connection);
        Ok(())
    }

    /// Nothing to play: arm the idle timer
    fn enter_idle(&mut self) {
        self.current = None;
        self.state = SessionState::IdlePendingDisconnect;

        let mailbox = self.mailbox.clone();
        self.idle.arm(self.config.idle_timeout(), move |generation| {
            let _ = mailbox.send(SessionMessage::IdleTimeout { generation });
        });
        debug!(community = %self.community, "Nothing to play, idle timer armed");
    }

    /// Recommendations keep failing: stop refilling and let the session idle
    async fn pause_recommendations(&mut self) {
        warn!(
            community = %self.community,
            drops = self.consecutive_drops,
            "Too many failed tracks in a row, not sampling more"
        );
        self.consecutive_drops = 0;

        if let Some(destination) = self.last_destination.clone() {
            self.announce(
                &destination.text_channel,
                "Too many tracks failed in a row, recommendations paused",
            )
            .await;
        }
    }

    /// Leave voice and reset to a clean slate
    ///
    /// Play counts, history and pending searches survive.
    async fn force_disconnect(&mut self, reason: &str) {
        self.release_connection().await;
        self.queue.clear();
        self.current = None;
        self.auto_recommend = false;
        self.idle.disarm();
        self.last_destination = None;
        self.consecutive_drops = 0;
        self.state = SessionState::Disconnected;

        info!(community = %self.community, reason, "Session disconnected");
    }

    async fn release_connection(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.stop().await;
            if let Err(e) = connection.disconnect().await {
                warn!(community = %self.community, error = %e, "Voice disconnect failed");
            }
            connection.destroy().await;
        }
        self.token = self.token.next();
    }

    // ===== Events =====

    async fn on_transport(&mut self, connection: u64, event: TransportEvent) {
        if connection != self.connection_id || self.connection.is_none() {
            debug!(community = %self.community, connection, ?event, "Event from released connection ignored");
            return;
        }

        match event {
            TransportEvent::Ready => {
                debug!(community = %self.community, "Voice connection ready");
            }
            TransportEvent::Finished { token } => self.on_finished(token).await,
            TransportEvent::Failed { token, reason } => self.on_failed(token, &reason).await,
            TransportEvent::Disconnected => {
                warn!(community = %self.community, "Voice connection dropped");
                self.force_disconnect("voice connection dropped").await;
            }
        }
    }

    async fn on_finished(&mut self, token: PlaybackToken) {
        if token != self.token {
            debug!(community = %self.community, %token, current = %self.token, "Stale finish ignored");
            return;
        }
        let Some(request) = self.current.take() else {
            return;
        };

        let plays = self.ranks.credit(&request.track.id);
        self.history.push(request.track.id.clone());
        info!(community = %self.community, track = %request.track.id, plays, "Track finished");

        self.advance().await;
    }

    async fn on_failed(&mut self, token: PlaybackToken, reason: &str) {
        if token != self.token {
            debug!(community = %self.community, %token, current = %self.token, "Stale failure ignored");
            return;
        }
        let Some(request) = self.current.take() else {
            return;
        };

        match self.retry_or_drop(request, reason).await {
            Some(retry) => {
                if let Render::Dropped = self.render(retry).await {
                    self.advance().await;
                }
            }
            None => self.advance().await,
        }
    }

    async fn on_idle_timeout(&mut self, generation: u64) {
        if !self.idle.accept(generation) {
            debug!(community = %self.community, generation, "Stale idle timeout ignored");
            return;
        }
        if self.current.is_some() {
            return;
        }
        info!(community = %self.community, "Idle timeout reached");
        self.force_disconnect("idle timeout").await;
    }

    async fn check_occupancy(&mut self) {
        let members = match self.connection.as_ref() {
            Some(connection) => connection.member_count().await,
            None => return,
        };
        if let Some(members) = members {
            if members <= 1 {
                info!(community = %self.community, "Voice channel empty");
                self.force_disconnect("voice channel empty").await;
            }
        }
    }

    // ===== Persistence =====

    async fn load_ranks(&mut self) {
        match self.deps.ranks.load(&self.community).await {
            Ok(counts) => {
                info!(community = %self.community, tracks = counts.len(), "Play counts loaded");
                self.ranks = RankStore::from_map(counts);
            }
            Err(e) => {
                warn!(community = %self.community, error = %e, "Failed to load play counts, starting empty");
            }
        }
    }

    async fn flush_ranks(&mut self) {
        if !self.ranks.is_dirty() {
            return;
        }
        let counts = self.ranks.to_map();
        match self.deps.ranks.save(&self.community, &counts).await {
            Ok(()) => {
                self.ranks.mark_clean();
                debug!(community = %self.community, tracks = counts.len(), "Play counts saved");
            }
            Err(e) => {
                warn!(community = %self.community, error = %e, "Failed to save play counts");
            }
        }
    }

    async fn shutdown(&mut self) {
        self.flush_ranks().await;
        self.release_connection().await;
        self.idle.disarm();
        self.current = None;
        self.state = SessionState::Disconnected;
        info!(community = %self.community, "Session shut down");
    }

    // ===== Helpers =====

    async fn draw(&mut self, count: usize) -> Vec<Track> {
        let excluded = self.excluded_ids();
        self.sampler
            .sample(
                count,
                &self.ranks,
                &excluded,
                self.deps.catalog.as_ref(),
                &mut self.rng,
            )
            .await
    }

    /// Ids the sampler must not draw right now
    fn excluded_ids(&self) -> HashSet<String> {
        let mut ids: HashSet<String> = self.queue.track_ids().map(str::to_string).collect();
        ids.extend(self.history.iter().map(str::to_string));
        if let Some(current) = &self.current {
            ids.insert(current.track.id.clone());
        }
        ids
    }

    async fn lookup_tracks(&self, id: &str) -> Vec<Track> {
        match self.deps.catalog.resolve_tracks(&[id.to_string()]).await {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!(community = %self.community, track = %id, error = %e, "Track lookup failed");
                Vec::new()
            }
        }
    }

    async fn reply(&self, origin: &Origin, text: &str, retract_origin: bool) -> Option<MessageRef> {
        match self.deps.messenger.reply(origin, text, retract_origin).await {
            Ok(message) => Some(message),
            Err(e) => {
                warn!(community = %self.community, error = %e, "Failed to reply");
                None
            }
        }
    }

    async fn announce(&self, channel: &ChannelId, text: &str) {
        if let Err(e) = self.deps.messenger.send(channel, text).await {
            warn!(community = %self.community, channel = %channel, error = %e, "Failed to announce");
        }
    }

    async fn retract(&self, message: &MessageRef) {
        if let Err(e) = self.deps.messenger.retract(message).await {
            debug!(community = %self.community, error = %e, "Failed to retract message");
        }
    }
}

impl fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("community", &self.community)
            .field("state", &self.state)
            .field("queue", &self.queue.len())
            .field("auto_recommend", &self.auto_recommend)
            .finish_non_exhaustive()
    }
}
