//! Configuration and observable session state

use serde::{Deserialize, Serialize};
use sona_core::{PlayRequest, PlaybackToken, RankMap};
use std::time::Duration;

/// Recommendation sampler tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Shortest track accepted, in seconds
    pub min_duration_secs: u32,

    /// Longest track accepted, in seconds
    pub max_duration_secs: u32,

    /// Draw/resolve rounds before giving up on the shortfall
    pub max_rounds: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            min_duration_secs: 60,
            max_duration_secs: 480,
            max_rounds: 6,
        }
    }
}

impl SamplerConfig {
    /// Whether a track of this length may be recommended
    pub fn accepts(&self, duration_secs: u32) -> bool {
        (self.min_duration_secs..=self.max_duration_secs).contains(&duration_secs)
    }
}

/// Playback session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Recently played ids kept for recommendation exclusion
    pub history_size: usize,

    /// Idle time before the session leaves voice
    pub idle_timeout_secs: u64,

    /// Interval between rank flushes
    pub rank_flush_interval_secs: u64,

    /// Replays of a failing request before it is dropped
    pub max_retries: u32,

    /// Recommendation sampler tuning
    pub sampler: SamplerConfig,

    /// Tracks added by the recommend command when no count is given
    pub sample_count: usize,

    /// Interval between voice channel occupancy checks
    pub occupancy_check_interval_secs: u64,

    /// Dropped requests in a row before auto recommend stops refilling
    pub max_consecutive_drops: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_size: 50,
            idle_timeout_secs: 60,
            rank_flush_interval_secs: 3600,
            max_retries: 3,
            sampler: SamplerConfig::default(),
            sample_count: 5,
            occupancy_check_interval_secs: 5,
            max_consecutive_drops: 5,
        }
    }
}

impl PlaybackConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn rank_flush_interval(&self) -> Duration {
        Duration::from_secs(self.rank_flush_interval_secs)
    }

    pub fn occupancy_check_interval(&self) -> Duration {
        Duration::from_secs(self.occupancy_check_interval_secs)
    }
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Never connected
    Idle,

    /// Waiting on the voice transport
    Connecting,

    /// A stream is attached
    Playing,

    /// Re-attaching a request after a playback failure
    Retrying,

    /// Connected with nothing to play; the idle timer is armed
    IdlePendingDisconnect,

    /// Connection released after an idle timeout or forced disconnect
    Disconnected,
}

impl SessionState {
    /// Whether nothing is being rendered
    pub fn is_idle(self) -> bool {
        matches!(
            self,
            Self::Idle | Self::IdlePendingDisconnect | Self::Disconnected
        )
    }
}

/// Point-in-time view of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub current: Option<PlayRequest>,
    pub queue: Vec<PlayRequest>,
    pub history: Vec<String>,
    pub play_counts: RankMap,
    pub auto_recommend: bool,
    pub idle_timer_armed: bool,
    pub connected: bool,
    pub token: PlaybackToken,
}
