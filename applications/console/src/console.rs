//! Chat-style command parsing
//!
//! Lines starting with `!` are commands; anything else is chatter and is
//! ignored, the way a chat bot ignores ordinary messages.

use sona_core::{ChannelId, MessageId, Origin, UserId};
use sona_playback::Command;
use thiserror::Error;

/// Command prefix
pub const PREFIX: char = '!';

/// Channel ids used by the simulated community
pub const TEXT_CHANNEL: &str = "console-text";
pub const VOICE_CHANNEL: &str = "console-voice";

pub const HELP: &str = "\
!play <keyword | link | number>  search, queue a link, or pick a search result
!skip                            skip the current track
!list                            show the queue
!random [count]                  queue recommended tracks
!rank                            show the most played tracks
!auto                            toggle auto recommend
!shuffle                         shuffle the queue
!leave / !join                   step out of or back into the voice channel
!help                            show this help
!quit                            stop";

/// A parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Forward to the session
    Command(Command),

    /// Move the console user out of (`false`) or into (`true`) voice
    Presence(bool),

    Help,

    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown command !{0}, try !help")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// Who is typing and whether they sit in the voice channel
#[derive(Debug, Clone)]
pub struct Speaker {
    user: UserId,
    in_voice: bool,
    sent: u64,
}

impl Speaker {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: UserId::new(user),
            in_voice: true,
            sent: 0,
        }
    }

    pub fn in_voice(&self) -> bool {
        self.in_voice
    }

    pub fn set_in_voice(&mut self, in_voice: bool) {
        self.in_voice = in_voice;
    }

    /// Origin for the next typed line
    pub fn next_origin(&mut self) -> Origin {
        self.sent += 1;
        let origin = Origin::new(self.user.clone(), ChannelId::new(TEXT_CHANNEL))
            .with_message(MessageId::new(format!("line-{}", self.sent)));
        if self.in_voice {
            origin.in_voice(ChannelId::new(VOICE_CHANNEL))
        } else {
            origin
        }
    }
}

/// Parse one line of input
///
/// Returns `Ok(None)` for blank lines and chatter.
pub fn parse_line(line: &str, speaker: &mut Speaker) -> Result<Option<Input>, ParseError> {
    let Some(body) = line.trim().strip_prefix(PREFIX) else {
        return Ok(None);
    };

    let (name, rest) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (body, ""),
    };

    let input = match name.to_lowercase().as_str() {
        "play" | "p" => {
            if rest.is_empty() {
                return Err(ParseError::Usage("!play <keyword | link | number>"));
            }
            Input::Command(Command::Play {
                origin: speaker.next_origin(),
                text: rest.to_string(),
            })
        }
        "skip" | "s" => Input::Command(Command::Skip {
            origin: speaker.next_origin(),
        }),
        "list" | "queue" | "q" => Input::Command(Command::ListQueue {
            origin: speaker.next_origin(),
        }),
        "random" | "r" => {
            let count = if rest.is_empty() {
                None
            } else {
                Some(
                    rest.parse::<usize>()
                        .map_err(|_| ParseError::Usage("!random [count]"))?,
                )
            };
            Input::Command(Command::SampleAndEnqueue {
                origin: speaker.next_origin(),
                count,
            })
        }
        "rank" => Input::Command(Command::RankReport {
            origin: speaker.next_origin(),
        }),
        "auto" => Input::Command(Command::ToggleAutoRecommend {
            origin: speaker.next_origin(),
        }),
        "shuffle" => Input::Command(Command::ShuffleQueue {
            origin: speaker.next_origin(),
        }),
        "leave" => Input::Presence(false),
        "join" => Input::Presence(true),
        "help" | "h" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };

    Ok(Some(input))
}
