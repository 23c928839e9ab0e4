//! Recently played track ids
//!
//! Fixed-capacity ring used to keep recommendations from repeating
//! what was just heard.

use std::collections::VecDeque;

/// Bounded FIFO of track ids; oldest evicted first
#[derive(Debug, Clone)]
pub struct BoundedHistory {
    /// Most recent = back
    ids: VecDeque<String>,

    capacity: usize,
}

impl BoundedHistory {
    /// Create a history holding at most `capacity` ids
    pub fn new(capacity: usize) -> Self {
        Self {
            ids: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a played id
    ///
    /// If the history is full the oldest id is discarded.
    pub fn push(&mut self, id: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        if self.ids.len() >= self.capacity {
            self.ids.pop_front();
        }
        self.ids.push_back(id.into());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|entry| entry == id)
    }

    /// Ids oldest first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
