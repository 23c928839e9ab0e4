/// Core error types for Sona
use thiserror::Error;

/// Result type alias using `SonaError`
pub type Result<T> = std::result::Result<T, SonaError>;

/// Error raised by collaborators at the edge of the orchestrator
#[derive(Error, Debug)]
pub enum SonaError {
    /// Catalog could not resolve an id, keyword or playlist
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// Voice transport handshake or mid-session failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Audio stream could not be acquired
    #[error("Stream error: {0}")]
    Stream(String),

    /// Player rejected or aborted a stream
    #[error("Playback error: {0}")]
    Playback(String),

    /// Rank persistence failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Chat platform refused a reply, send or retraction
    #[error("Messaging error: {0}")]
    Messaging(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl SonaError {
    /// Create a lookup error
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a stream error
    pub fn stream(msg: impl Into<String>) -> Self {
        Self::Stream(msg.into())
    }

    /// Create a playback error
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create a messaging error
    pub fn messaging(msg: impl Into<String>) -> Self {
        Self::Messaging(msg.into())
    }

    /// Whether the error came from the voice transport
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
