//! Pending play requests
//!
//! A plain FIFO. Sampler-generated, searched, linked and playlist requests
//! all land here in arrival order.

use rand::seq::SliceRandom;
use rand::Rng;
use sona_core::PlayRequest;
use std::collections::VecDeque;

/// Ordered list of requests waiting to be rendered
#[derive(Debug, Clone, Default)]
pub struct Queue {
    /// Front = next to play
    requests: VecDeque<PlayRequest>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the back
    pub fn enqueue(&mut self, request: PlayRequest) {
        self.requests.push_back(request);
    }

    /// Append several requests, keeping their order
    pub fn extend(&mut self, requests: impl IntoIterator<Item = PlayRequest>) {
        self.requests.extend(requests);
    }

    /// Pop the front request
    pub fn dequeue_next(&mut self) -> Option<PlayRequest> {
        self.requests.pop_front()
    }

    /// All pending requests, next first
    pub fn peek_all(&self) -> Vec<&PlayRequest> {
        self.requests.iter().collect()
    }

    /// Whether a request for this track is pending
    pub fn contains(&self, track_id: &str) -> bool {
        self.requests.iter().any(|r| r.track.id == track_id)
    }

    /// Ids of every pending track
    pub fn track_ids(&self) -> impl Iterator<Item = &str> {
        self.requests.iter().map(|r| r.track.id.as_str())
    }

    /// Uniform in-place permutation (Fisher-Yates)
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.requests.make_contiguous().shuffle(rng);
    }

    pub fn clear(&mut self) {
        self.requests.clear();
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
