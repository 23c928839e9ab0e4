//! Per-community play counts

use sona_core::RankMap;
use std::cmp::Reverse;

/// Track id to natural-completion count
///
/// Counts only ever grow. The dirty flag tracks whether anything changed
/// since the last successful flush.
#[derive(Debug, Clone, Default)]
pub struct RankStore {
    counts: RankMap,
    dirty: bool,
}

impl RankStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap counts loaded from storage
    pub fn from_map(counts: RankMap) -> Self {
        Self {
            counts,
            dirty: false,
        }
    }

    /// Credit one natural completion, returning the new count
    pub fn credit(&mut self, track_id: &str) -> u64 {
        let count = self.counts.entry(track_id.to_string()).or_insert(0);
        *count += 1;
        self.dirty = true;
        *count
    }

    pub fn count(&self, track_id: &str) -> u64 {
        self.counts.get(track_id).copied().unwrap_or(0)
    }

    /// Whether no id has a positive count
    pub fn is_empty(&self) -> bool {
        self.counts.values().all(|&count| count == 0)
    }

    /// Every id repeated once per play
    ///
    /// Ids with a zero count never appear.
    pub fn weighted_pool(&self) -> Vec<&str> {
        let total: u64 = self.counts.values().sum();
        let mut pool = Vec::with_capacity(usize::try_from(total).unwrap_or(0));
        for (id, &count) in &self.counts {
            for _ in 0..count {
                pool.push(id.as_str());
            }
        }
        pool
    }

    /// Up to `limit` entries, highest count first, ties by id
    pub fn top(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self
            .counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(id, &count)| (id.as_str(), count))
            .collect();
        entries.sort_by_key(|&(id, count)| (Reverse(count), id));
        entries.truncate(limit);
        entries
    }

    /// Copy of the counts for persisting
    pub fn to_map(&self) -> RankMap {
        self.counts.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that the current counts are persisted
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }
}
