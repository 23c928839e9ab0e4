//! Error types for playback orchestration

use sona_core::SonaError;
use thiserror::Error;

/// Problems with what the user asked for
///
/// These are replied to the user and never change session state. The
/// display text is the reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserInputError {
    /// Search pick outside `[1, size]`
    #[error("Pick a number between 1 and {size} (got {index})")]
    OutOfRange { index: usize, size: usize },

    /// Search pick without a pending search
    #[error("Search for something first")]
    NoActiveSearch,

    /// Playback command from a user outside voice
    #[error("Join a voice channel first")]
    NotInVoiceChannel,

    /// Recommendation or report with no play history
    #[error("No play counts yet, listen to some music first")]
    EmptyRankData,

    /// Playlist link that expanded to nothing
    #[error("That playlist is unavailable or empty")]
    PlaylistUnavailable,

    /// Track link whose metadata could not be resolved
    #[error("Could not look up that track, check the link")]
    TrackUnavailable,

    /// Keyword search without results
    #[error("No results for \"{0}\"")]
    NoSearchResults(String),

    /// Skip with nothing playing
    #[error("Nothing is playing")]
    NothingPlaying,

    /// Recommendation count of zero
    #[error("Ask for at least one track")]
    InvalidCount,
}

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The command was rejected; the user has been told why
    #[error(transparent)]
    UserInput(#[from] UserInputError),

    /// A collaborator failed
    #[error(transparent)]
    Collaborator(#[from] SonaError),

    /// The session task is gone
    #[error("Session for community {0} has shut down")]
    SessionClosed(String),
}

impl PlaybackError {
    /// The user input problem, if that is what this is
    pub fn user_input(&self) -> Option<&UserInputError> {
        match self {
            Self::UserInput(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
