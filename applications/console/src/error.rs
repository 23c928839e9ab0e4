/// Console error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] sona_catalog::CatalogError),

    #[error("Storage error: {0}")]
    Storage(#[from] sona_storage::StorageError),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
