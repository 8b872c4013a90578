use crate::algorithms::{MeanAbsoluteDifference, SimilarityMetric};
use crate::error::Result;
use crate::models::ItemId;
use crate::services::rating_store::RatingStore;
use tracing::trace;

/// Lazily computed, symmetric item-item similarity.
///
/// Holds no similarity data of its own: memo entries live inside the store's
/// items and persist after the cache is dropped. A value computed for
/// `(a, b)` is written under both `a` and `b` and never recomputed.
pub struct SimilarityCache<'s, M = MeanAbsoluteDifference> {
    store: &'s mut RatingStore,
    metric: M,
    computations: u64,
}

impl<'s> SimilarityCache<'s> {
    pub fn new(store: &'s mut RatingStore, half_scale_width: f64) -> Self {
        Self::with_metric(store, MeanAbsoluteDifference::new(half_scale_width))
    }
}

impl<'s, M: SimilarityMetric> SimilarityCache<'s, M> {
    pub fn with_metric(store: &'s mut RatingStore, metric: M) -> Self {
        Self {
            store,
            metric,
            computations: 0,
        }
    }

    pub fn similarity(&mut self, a: ItemId, b: ItemId) -> Result<f64> {
        if let Some(cached) = self.store.cached_similarity(a, b)? {
            return Ok(cached);
        }

        let pairs = self.store.co_ratings(a, b)?;
        let value = self.metric.score(&pairs);
        self.computations += 1;
        trace!("similarity({}, {}) = {} over {} shared raters", a, b, value, pairs.len());

        self.store.record_similarity(a, b, value)?;
        Ok(value)
    }

    /// Number of similarities computed (not served from the memo) so far.
    pub fn computations(&self) -> u64 {
        self.computations
    }

    pub fn store(&self) -> &RatingStore {
        self.store
    }
}
