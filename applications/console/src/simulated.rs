//! Stand-ins for the chat platform and voice backend
//!
//! Audio streams are silent byte runs sized to the track length; the
//! simulated player drains them at `speed` simulated seconds per real second
//! and reports a natural finish at the end.

use async_trait::async_trait;
use sona_core::{
    AudioStream, Catalog, ChannelId, MessageId, MessageRef, Messenger, Origin, PlaybackToken,
    SonaError, StreamSource, TransportEvent, TransportEvents, VoiceConnection, VoiceTransport,
};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Bytes standing in for one second of audio
pub const BYTES_PER_SECOND: usize = 16;

/// Voice backend whose channel holds the bot plus `listeners`
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    speed: f64,
    listeners: Arc<AtomicUsize>,
}

impl SimulatedTransport {
    pub fn new(speed: f64) -> Self {
        Self {
            speed,
            listeners: Arc::new(AtomicUsize::new(1)),
        }
    }

    /// Number of people in the voice channel, the bot excluded
    pub fn set_listeners(&self, listeners: usize) {
        self.listeners.store(listeners, Ordering::SeqCst);
    }

    fn tick(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.speed).unwrap_or(Duration::ZERO)
    }
}

#[async_trait]
impl VoiceTransport for SimulatedTransport {
    async fn connect(
        &self,
        channel: &ChannelId,
        events: TransportEvents,
    ) -> sona_core::Result<Box<dyn VoiceConnection>> {
        info!(channel = %channel, "Joined simulated voice channel");
        events.emit(TransportEvent::Ready);
        Ok(Box::new(SimulatedConnection {
            channel: channel.clone(),
            events,
            tick: self.tick(),
            listeners: Arc::clone(&self.listeners),
            player: None,
        }))
    }
}

/// One joined channel and its player task
pub struct SimulatedConnection {
    channel: ChannelId,
    events: TransportEvents,
    tick: Duration,
    listeners: Arc<AtomicUsize>,
    player: Option<JoinHandle<()>>,
}

impl SimulatedConnection {
    fn halt(&mut self) {
        if let Some(player) = self.player.take() {
            player.abort();
        }
    }
}

#[async_trait]
impl VoiceConnection for SimulatedConnection {
    async fn play(&mut self, stream: AudioStream, token: PlaybackToken) -> sona_core::Result<()> {
        self.halt();

        let events = self.events.clone();
        let tick = self.tick;
        self.player = Some(tokio::spawn(async move {
            let mut stream = stream;
            let mut second = [0u8; BYTES_PER_SECOND];
            loop {
                match stream.read(&mut second).await {
                    Ok(0) => {
                        events.emit(TransportEvent::Finished { token });
                        return;
                    }
                    Ok(_) => tokio::time::sleep(tick).await,
                    Err(e) => {
                        events.emit(TransportEvent::Failed {
                            token,
                            reason: e.to_string(),
                        });
                        return;
                    }
                }
            }
        }));
        debug!(channel = %self.channel, token = %token, "Simulated player started");
        Ok(())
    }

    async fn stop(&mut self) {
        self.halt();
    }

    async fn disconnect(&mut self) -> sona_core::Result<()> {
        self.halt();
        info!(channel = %self.channel, "Left simulated voice channel");
        Ok(())
    }

    async fn destroy(&mut self) {
        self.halt();
    }

    async fn member_count(&self) -> Option<usize> {
        Some(1 + self.listeners.load(Ordering::SeqCst))
    }
}

impl Drop for SimulatedConnection {
    fn drop(&mut self) {
        self.halt();
    }
}

/// Silent streams sized from catalog durations
pub struct SimulatedStreams {
    catalog: Arc<dyn Catalog>,
}

impl SimulatedStreams {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl StreamSource for SimulatedStreams {
    async fn open(&self, track_id: &str) -> sona_core::Result<AudioStream> {
        let durations = self
            .catalog
            .resolve_durations(&[track_id.to_string()])
            .await?;
        let secs = durations
            .get(track_id)
            .copied()
            .ok_or_else(|| SonaError::stream(format!("No audio available for {}", track_id)))?;

        let len = u64::from(secs) * BYTES_PER_SECOND as u64;
        Ok(Box::new(tokio::io::repeat(0).take(len)))
    }
}

/// Prints replies and announcements to stdout
#[derive(Debug, Default)]
pub struct ConsoleMessenger {
    posted: AtomicU64,
}

impl ConsoleMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_ref(&self, channel: &ChannelId) -> MessageRef {
        let id = self.posted.fetch_add(1, Ordering::SeqCst) + 1;
        MessageRef::new(channel.clone(), MessageId::new(format!("msg-{}", id)))
    }
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn reply(
        &self,
        origin: &Origin,
        text: &str,
        retract_origin: bool,
    ) -> sona_core::Result<MessageRef> {
        if retract_origin {
            if let Some(message) = origin.message_ref() {
                debug!(message = %message.message, "Command message retracted");
            }
        }
        println!("@{} {}", origin.user, text);
        Ok(self.next_ref(&origin.text_channel))
    }

    async fn send(&self, channel: &ChannelId, text: &str) -> sona_core::Result<MessageRef> {
        println!("{}", text);
        Ok(self.next_ref(channel))
    }

    async fn retract(&self, message: &MessageRef) -> sona_core::Result<()> {
        debug!(message = %message.message, "Message retracted");
        Ok(())
    }
}
