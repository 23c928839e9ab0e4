//! Idle disconnect deadline

use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Single cancellable deadline
///
/// Each arm gets a new generation number which the firing callback
/// receives. A firing that was already queued when the timer was disarmed
/// or re-armed carries an old generation and fails [`IdleTimer::accept`].
#[derive(Debug, Default)]
pub struct IdleTimer {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl IdleTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `on_fire` after `delay`, replacing any outstanding deadline
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm<F>(&mut self, delay: Duration, on_fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;

        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire(generation);
        }));

        debug!(generation, delay_secs = delay.as_secs(), "Idle timer armed");
        generation
    }

    /// Cancel the outstanding deadline, if any
    pub fn disarm(&mut self) {
        if self.cancel() {
            self.generation += 1;
            debug!(generation = self.generation, "Idle timer disarmed");
        }
    }

    /// Consume a firing; `false` means it is stale and must be ignored
    pub fn accept(&mut self, generation: u64) -> bool {
        if self.handle.is_some() && generation == self.generation {
            self.handle = None;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for IdleTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
