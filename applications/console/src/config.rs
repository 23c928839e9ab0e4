/// Console configuration
use crate::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use sona_catalog::YoutubeConfig;
use sona_playback::PlaybackConfig;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "sona.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SonaConfig {
    #[serde(default = "default_catalog")]
    pub catalog: CatalogSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default = "default_console")]
    pub console: ConsoleSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_rank_root")]
    pub rank_root: PathBuf,

    #[serde(default = "default_rank_prefix")]
    pub rank_prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_community")]
    pub community: String,

    #[serde(default = "default_user")]
    pub user: String,

    /// Simulated playback speed; 60 plays a minute of audio per second
    #[serde(default = "default_speed")]
    pub speed: f64,
}

impl SonaConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `sona.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. SONA_CATALOG__API_KEY
        settings = settings.add_source(
            config::Environment::with_prefix("SONA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ConsoleError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ConsoleError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.catalog.api_key.trim().is_empty() {
            return Err(ConsoleError::Config(
                "YouTube API key is required (set SONA_CATALOG__API_KEY)".to_string(),
            ));
        }

        if !(self.console.speed.is_finite() && self.console.speed > 0.0) {
            return Err(ConsoleError::Config(format!(
                "Playback speed must be positive, got {}",
                self.console.speed
            )));
        }

        if self.console.community.trim().is_empty() {
            return Err(ConsoleError::Config("Community name is empty".to_string()));
        }

        let sampler = &self.playback.sampler;
        if sampler.min_duration_secs > sampler.max_duration_secs {
            return Err(ConsoleError::Config(format!(
                "Sampler window is inverted ({}s > {}s)",
                sampler.min_duration_secs, sampler.max_duration_secs
            )));
        }
        if sampler.max_rounds == 0 {
            return Err(ConsoleError::Config(
                "Sampler needs at least one round".to_string(),
            ));
        }

        Ok(())
    }

    /// Catalog client settings
    pub fn youtube(&self) -> YoutubeConfig {
        let youtube =
            YoutubeConfig::new(self.catalog.api_key.trim()).with_base_url(&self.catalog.base_url);
        match &self.catalog.region {
            Some(region) => youtube.with_region(region),
            None => youtube,
        }
    }
}

impl Default for SonaConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            storage: default_storage(),
            playback: PlaybackConfig::default(),
            console: default_console(),
        }
    }
}

// Default values
fn default_catalog() -> CatalogSettings {
    CatalogSettings {
        api_key: String::new(),
        base_url: default_base_url(),
        region: None,
    }
}

fn default_base_url() -> String {
    sona_catalog::DEFAULT_BASE_URL.to_string()
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        rank_root: default_rank_root(),
        rank_prefix: default_rank_prefix(),
    }
}

fn default_rank_root() -> PathBuf {
    PathBuf::from("./data/ranks")
}

fn default_rank_prefix() -> String {
    "song_rank".to_string()
}

fn default_console() -> ConsoleSettings {
    ConsoleSettings {
        community: default_community(),
        user: default_user(),
        speed: default_speed(),
    }
}

fn default_community() -> String {
    "console".to_string()
}

fn default_user() -> String {
    "listener".to_string()
}

fn default_speed() -> f64 {
    60.0
}
