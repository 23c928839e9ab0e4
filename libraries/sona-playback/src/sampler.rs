//! Weighted random recommendations
//!
//! Tracks are drawn from the rank store with probability proportional to
//! their play count:
//! 1. Build a pool holding every id once per play, then Fisher-Yates shuffle it
//! 2. Walk the pool taking distinct ids that are not excluded
//! 3. Resolve the batch through the catalog in one call
//! 4. Keep tracks whose length falls inside the configured window
//!
//! Any shortfall is drawn again, up to `max_rounds` rounds. Ids drawn in an
//! earlier round are never drawn again, whether or not they resolved.

use crate::ranks::RankStore;
use crate::types::SamplerConfig;
use rand::seq::SliceRandom;
use rand::Rng;
use sona_core::{Catalog, Track};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Draws recommendation batches
#[derive(Debug, Clone, Default)]
pub struct RecommendationSampler {
    config: SamplerConfig,
}

impl RecommendationSampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Draw up to `count` playable tracks
    ///
    /// Best effort: returns fewer (possibly none) when the pool runs dry,
    /// the catalog fails, or the rounds run out. `excluded` holds ids that
    /// must not be drawn (queued, recently played).
    pub async fn sample<R>(
        &self,
        count: usize,
        ranks: &RankStore,
        excluded: &HashSet<String>,
        catalog: &dyn Catalog,
        rng: &mut R,
    ) -> Vec<Track>
    where
        R: Rng + Send + ?Sized,
    {
        let mut picked: Vec<Track> = Vec::with_capacity(count);
        if count == 0 {
            return picked;
        }

        let mut pool: Vec<String> = ranks
            .weighted_pool()
            .into_iter()
            .filter(|id| !excluded.contains(*id))
            .map(str::to_string)
            .collect();
        let mut drawn: HashSet<String> = HashSet::new();

        for round in 0..self.config.max_rounds {
            let wanted = count - picked.len();
            if wanted == 0 {
                break;
            }

            pool.retain(|id| !drawn.contains(id));
            pool.shuffle(rng);

            let mut batch: Vec<String> = Vec::with_capacity(wanted);
            for id in &pool {
                if batch.len() == wanted {
                    break;
                }
                if !batch.contains(id) {
                    batch.push(id.clone());
                }
            }

            if batch.is_empty() {
                debug!(round, "Recommendation pool exhausted");
                break;
            }
            drawn.extend(batch.iter().cloned());

            let tracks = match catalog.resolve_tracks(&batch).await {
                Ok(tracks) => tracks,
                Err(e) => {
                    warn!(round, error = %e, "Recommendation lookup failed, dropping round");
                    continue;
                }
            };

            let resolved = tracks.len();
            picked.extend(
                tracks
                    .into_iter()
                    .filter(|track| self.config.accepts(track.duration_secs)),
            );
            debug!(
                round,
                drawn = batch.len(),
                resolved,
                total = picked.len(),
                "Recommendation round complete"
            );
        }

        picked.truncate(count);
        picked
    }
}
