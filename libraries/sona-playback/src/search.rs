//! Pending search results per user

use crate::error::UserInputError;
use sona_core::{ChannelId, MessageRef, Track, UserId};
use std::collections::HashMap;

/// Results of one keyword search awaiting a pick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultSet {
    pub tracks: Vec<Track>,

    /// Channel the search was issued on
    pub text_channel: ChannelId,

    /// The posted listing, retracted once the set is resolved or replaced
    pub message: Option<MessageRef>,
}

impl SearchResultSet {
    pub fn new(tracks: Vec<Track>, text_channel: ChannelId, message: Option<MessageRef>) -> Self {
        Self {
            tracks,
            text_channel,
            message,
        }
    }
}

/// A picked search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPick {
    pub track: Track,

    /// Listing message to retract
    pub message: Option<MessageRef>,
}

/// At most one result set per user
#[derive(Debug, Clone, Default)]
pub struct SearchRegistry {
    entries: HashMap<UserId, SearchResultSet>,
}

impl SearchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a user's latest results, returning the set it replaces
    pub fn record(&mut self, user: UserId, set: SearchResultSet) -> Option<SearchResultSet> {
        self.entries.insert(user, set)
    }

    /// Take result `index` (1-based) and forget the set
    ///
    /// An out-of-range index leaves the set in place.
    pub fn resolve(&mut self, user: &UserId, index: usize) -> Result<SearchPick, UserInputError> {
        let set = self
            .entries
            .get(user)
            .ok_or(UserInputError::NoActiveSearch)?;

        let size = set.tracks.len();
        if index == 0 || index > size {
            return Err(UserInputError::OutOfRange { index, size });
        }

        let mut set = self
            .entries
            .remove(user)
            .ok_or(UserInputError::NoActiveSearch)?;
        Ok(SearchPick {
            track: set.tracks.swap_remove(index - 1),
            message: set.message,
        })
    }

    /// Forget a user's pending results, returning them for retraction
    pub fn evict(&mut self, user: &UserId) -> Option<SearchResultSet> {
        self.entries.remove(user)
    }

    pub fn get(&self, user: &UserId) -> Option<&SearchResultSet> {
        self.entries.get(user)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
