//! Commands accepted by a playback session

use sona_core::{Catalog, CatalogLink, Origin, Track};

/// A user command routed to one community's session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search, pick a search result, or queue a link
    Play { origin: Origin, text: String },

    /// Stop the current track and move on without crediting it
    Skip { origin: Origin },

    /// Reply with the pending queue
    ListQueue { origin: Origin },

    /// Queue recommended tracks; `None` uses the configured count
    SampleAndEnqueue { origin: Origin, count: Option<usize> },

    /// Reply with the most played tracks
    RankReport { origin: Origin },

    /// Flip auto-recommend mode
    ToggleAutoRecommend { origin: Origin },

    /// Randomise the pending queue
    ShuffleQueue { origin: Origin },
}

impl Command {
    /// Who issued the command
    pub fn origin(&self) -> &Origin {
        match self {
            Self::Play { origin, .. }
            | Self::Skip { origin }
            | Self::ListQueue { origin }
            | Self::SampleAndEnqueue { origin, .. }
            | Self::RankReport { origin }
            | Self::ToggleAutoRecommend { origin }
            | Self::ShuffleQueue { origin } => origin,
        }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Play { .. } => "play",
            Self::Skip { .. } => "skip",
            Self::ListQueue { .. } => "list",
            Self::SampleAndEnqueue { .. } => "sample",
            Self::RankReport { .. } => "rank",
            Self::ToggleAutoRecommend { .. } => "auto",
            Self::ShuffleQueue { .. } => "shuffle",
        }
    }
}

/// What a successful command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Tracks appended to the queue
    Enqueued(Vec<Track>),

    /// Search results posted for picking
    SearchListed(usize),

    /// The track that was skipped
    Skipped(Track),

    /// Queue listing posted
    Listed(usize),

    /// Rank report posted with this many entries
    Reported(usize),

    /// New auto-recommend setting
    AutoRecommend(bool),

    /// Queue reordered
    Shuffled(usize),
}

/// How the text of a play command is interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayRequestKind {
    /// 1-based pick from the user's last search
    Pick(usize),

    /// Catalog link to one track
    Track(String),

    /// Catalog link to a playlist
    Playlist(String),

    /// Anything else is a keyword search
    Search(String),
}

impl PlayRequestKind {
    /// Classify play text
    ///
    /// Bare non-negative integers pick a search result. Links are recognised
    /// by the catalog. Everything else is searched verbatim (trimmed).
    pub fn classify(text: &str, catalog: &dyn Catalog) -> Self {
        let text = text.trim();
        if let Ok(index) = text.parse::<usize>() {
            return Self::Pick(index);
        }
        match catalog.parse_link(text) {
            Some(CatalogLink::Playlist(id)) => Self::Playlist(id),
            Some(CatalogLink::Track(id)) => Self::Track(id),
            None => Self::Search(text.to_string()),
        }
    }
}
