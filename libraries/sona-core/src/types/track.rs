use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A playable catalog item
///
/// Built from a catalog lookup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    /// Catalog identifier (video id for YouTube)
    pub id: String,

    /// Display title
    pub title: String,

    /// Length in whole seconds
    pub duration_secs: u32,
}

impl Track {
    /// Create a track
    pub fn new(id: impl Into<String>, title: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration_secs,
        }
    }

    /// Track length
    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_secs))
    }

    /// Human readable length: `m:ss`, or `h:mm:ss` past one hour
    pub fn duration_label(&self) -> String {
        let hours = self.duration_secs / 3600;
        let minutes = (self.duration_secs % 3600) / 60;
        let seconds = self.duration_secs % 60;

        if hours > 0 {
            format!("{hours}:{minutes:02}:{seconds:02}")
        } else {
            format!("{minutes}:{seconds:02}")
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.duration_label())
    }
}
