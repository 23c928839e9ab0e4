use super::ids::{ChannelId, MessageId, UserId};
use super::track::Track;
use serde::{Deserialize, Serialize};

/// Where a request is rendered and announced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Voice channel the audio goes to
    pub voice_channel: ChannelId,

    /// Text channel for now-playing and retry announcements
    pub text_channel: ChannelId,
}

impl Destination {
    /// Create a destination
    pub fn new(voice_channel: ChannelId, text_channel: ChannelId) -> Self {
        Self {
            voice_channel,
            text_channel,
        }
    }
}

/// A track waiting in (or taken from) the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRequest {
    /// The track to render
    pub track: Track,

    /// Where to render it
    pub destination: Destination,

    /// Playback failures seen so far for this request
    pub error_count: u32,
}

impl PlayRequest {
    /// Create a fresh request with no recorded failures
    pub fn new(track: Track, destination: Destination) -> Self {
        Self {
            track,
            destination,
            error_count: 0,
        }
    }
}

/// A message posted on the chat platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    /// Channel the message lives in
    pub channel: ChannelId,

    /// Message id within the channel
    pub message: MessageId,
}

impl MessageRef {
    /// Create a message reference
    pub fn new(channel: ChannelId, message: MessageId) -> Self {
        Self { channel, message }
    }
}

/// Who issued a command and from where
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    /// Issuing user
    pub user: UserId,

    /// Voice channel the user currently sits in, if any
    pub voice_channel: Option<ChannelId>,

    /// Text channel the command arrived on
    pub text_channel: ChannelId,

    /// The command message itself, when the platform exposes one
    pub message: Option<MessageId>,
}

impl Origin {
    /// Create an origin without voice channel or message
    pub fn new(user: UserId, text_channel: ChannelId) -> Self {
        Self {
            user,
            voice_channel: None,
            text_channel,
            message: None,
        }
    }

    /// Attach the voice channel the user is in
    #[must_use]
    pub fn in_voice(mut self, voice_channel: ChannelId) -> Self {
        self.voice_channel = Some(voice_channel);
        self
    }

    /// Attach the originating message
    #[must_use]
    pub fn with_message(mut self, message: MessageId) -> Self {
        self.message = Some(message);
        self
    }

    /// Destination for requests issued by this origin
    ///
    /// `None` when the user is not in a voice channel.
    pub fn destination(&self) -> Option<Destination> {
        self.voice_channel
            .as_ref()
            .map(|voice| Destination::new(voice.clone(), self.text_channel.clone()))
    }

    /// Reference to the originating message, if any
    pub fn message_ref(&self) -> Option<MessageRef> {
        self.message
            .as_ref()
            .map(|message| MessageRef::new(self.text_channel.clone(), message.clone()))
    }
}
