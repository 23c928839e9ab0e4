//! Storage error types

use thiserror::Error;

/// Errors raised while reading or writing rank files
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem access failed
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The rank file is not a flat `{id: count}` object
    #[error("Malformed rank file {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

impl From<StorageError> for sona_core::SonaError {
    fn from(err: StorageError) -> Self {
        sona_core::SonaError::persistence(err.to_string())
    }
}
