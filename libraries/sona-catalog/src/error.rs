//! Error types for the YouTube catalog.

use thiserror::Error;

/// Errors that can occur when talking to the YouTube Data API.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the API response
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Client configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl From<CatalogError> for sona_core::SonaError {
    fn from(err: CatalogError) -> Self {
        sona_core::SonaError::lookup(err.to_string())
    }
}
