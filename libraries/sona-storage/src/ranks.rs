/// JSON file rank repository
use crate::error::{Result, StorageError};
use async_trait::async_trait;
use sona_core::{CommunityId, RankMap, RankRepository};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Stores one JSON rank map per community under a root directory
#[derive(Debug, Clone)]
pub struct JsonRankRepository {
    root: PathBuf,
    prefix: String,
}

impl JsonRankRepository {
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding a community's ranks
    pub fn path_for(&self, community: &CommunityId) -> PathBuf {
        self.root
            .join(format!("{}_{}.json", self.prefix, community.as_str()))
    }

    /// Create the root directory
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|source| io_error(&self.root, source))
    }

    pub async fn read(&self, community: &CommunityId) -> Result<RankMap> {
        let path = self.path_for(community);

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No rank file yet, starting empty");
                return Ok(RankMap::new());
            }
            Err(source) => return Err(io_error(&path, source)),
        };

        let ranks: RankMap =
            serde_json::from_slice(&data).map_err(|source| StorageError::Malformed {
                path: path.display().to_string(),
                source,
            })?;

        debug!(path = %path.display(), entries = ranks.len(), "Loaded rank file");
        Ok(ranks)
    }

    pub async fn write(&self, community: &CommunityId, ranks: &RankMap) -> Result<()> {
        let path = self.path_for(community);

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| io_error(parent, source))?;
        }

        let body = serde_json::to_vec(ranks).map_err(|source| StorageError::Malformed {
            path: path.display().to_string(),
            source,
        })?;

        let staging = path.with_extension("json.tmp");
        fs::write(&staging, body)
            .await
            .map_err(|source| io_error(&staging, source))?;
        fs::rename(&staging, &path)
            .await
            .map_err(|source| io_error(&path, source))?;

        debug!(path = %path.display(), entries = ranks.len(), "Saved rank file");
        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[async_trait]
impl RankRepository for JsonRankRepository {
    async fn load(&self, community: &CommunityId) -> sona_core::Result<RankMap> {
        Ok(self.read(community).await?)
    }

    async fn save(&self, community: &CommunityId, ranks: &RankMap) -> sona_core::Result<()> {
        Ok(self.write(community, ranks).await?)
    }
}
