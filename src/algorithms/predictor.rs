use crate::algorithms::{MeanAbsoluteDifference, SimilarityCache, SimilarityMetric};
use crate::config::RatingScale;
use crate::error::Result;
use crate::models::*;
use crate::services::rating_store::RatingStore;

/// Similarity-weighted item-item rating predictor.
///
/// A known rating is recalled verbatim. Otherwise the prediction is the
/// average of the user's ratings weighted by each rated item's similarity to
/// the target; when those weights sum to exactly zero the configured
/// cold-start rating is returned instead.
pub struct Predictor<'s, M = MeanAbsoluteDifference> {
    cache: SimilarityCache<'s, M>,
    cold_start_rating: f64,
}

impl<'s> Predictor<'s> {
    pub fn new(store: &'s mut RatingStore, scale: &RatingScale) -> Self {
        Self::with_cache(
            SimilarityCache::new(store, scale.half_scale_width),
            scale.cold_start_rating,
        )
    }
}

impl<'s, M: SimilarityMetric> Predictor<'s, M> {
    pub fn with_cache(cache: SimilarityCache<'s, M>, cold_start_rating: f64) -> Self {
        Self {
            cache,
            cold_start_rating,
        }
    }

    pub fn predict(&mut self, user: UserId, item: ItemId) -> Result<f64> {
        Ok(self.predict_detailed(user, item)?.value)
    }

    pub fn predict_detailed(&mut self, user: UserId, item: ItemId) -> Result<Prediction> {
        let store = self.cache.store();
        let history = store.items_rated_by(user)?;
        store.item(item)?;

        if let Some(&rating) = history.get(&item) {
            return Ok(Prediction {
                value: rating,
                source: PredictionSource::Recalled,
            });
        }

        // Similarity lookups write into the store, so release the borrow first.
        let history: Vec<(ItemId, f64)> = history.iter().map(|(&id, &rating)| (id, rating)).collect();

        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;
        for (rated_item, rating) in history {
            let similarity = self.cache.similarity(item, rated_item)?;
            weight_sum += similarity;
            weighted_sum += similarity * rating;
        }

        // Only an exact zero falls back; a negative sum still divides.
        if weight_sum == 0.0 {
            return Ok(Prediction {
                value: self.cold_start_rating,
                source: PredictionSource::ColdStart,
            });
        }

        Ok(Prediction {
            value: weighted_sum / weight_sum,
            source: PredictionSource::Weighted,
        })
    }

    pub fn cache(&self) -> &SimilarityCache<'s, M> {
        &self.cache
    }

    pub fn store(&self) -> &RatingStore {
        self.cache.store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecError;

    fn scenario_store() -> RatingStore {
        let mut store = RatingStore::new();
        store.add_item(1, "A").unwrap();
        store.add_item(2, "B").unwrap();
        store.add_observation(1, 1, 5.0).unwrap();
        store.add_observation(1, 2, 1.0).unwrap();
        store.add_observation(2, 1, 5.0).unwrap();
        store.add_observation(2, 2, 1.0).unwrap();
        store
    }

    #[test]
    fn test_exact_recall() {
        let mut store = scenario_store();
        let mut predictor = Predictor::new(&mut store, &RatingScale::reference());

        let prediction = predictor.predict_detailed(2, 2).unwrap();
        assert_eq!(prediction.value, 1.0);
        assert_eq!(prediction.source, PredictionSource::Recalled);
        assert_eq!(predictor.cache().computations(), 0);
    }

    #[test]
    fn test_single_neighbour_collapses_to_its_rating() {
        let mut store = scenario_store();
        store.add_observation(3, 1, 3.0).unwrap();
        let mut predictor = Predictor::new(&mut store, &RatingScale::reference());

        let prediction = predictor.predict_detailed(3, 2).unwrap();
        assert!((prediction.value - 3.0).abs() < 1e-12);
        assert_eq!(prediction.source, PredictionSource::Weighted);
    }

    #[test]
    fn test_weighted_average() {
        let mut store = RatingStore::new();
        for id in 1..=3 {
            store.add_item(id, format!("Item {}", id)).unwrap();
        }
        // user 1 links items 1 and 3 (identical ratings), user 2 links 2 and 3.
        store.add_observation(1, 1, 4.0).unwrap();
        store.add_observation(1, 3, 4.0).unwrap();
        store.add_observation(2, 2, 5.0).unwrap();
        store.add_observation(2, 3, 0.5).unwrap();
        store.add_observation(9, 1, 4.0).unwrap();
        store.add_observation(9, 2, 2.0).unwrap();

        let mut predictor = Predictor::new(&mut store, &RatingScale::reference());
        let value = predictor.predict(9, 3).unwrap();

        // sim(3,1) = 1.0, sim(3,2) = 1 - 4.5/4.5 = 0.0
        assert!((value - 4.0).abs() < 1e-12);
        assert_eq!(predictor.cache().computations(), 2);
    }

    #[test]
    fn test_cold_start_without_shared_raters() {
        let mut store = scenario_store();
        store.add_item(3, "C").unwrap();
        store.add_observation(5, 3, 4.0).unwrap();
        let mut predictor = Predictor::new(&mut store, &RatingScale::reference());

        let prediction = predictor.predict_detailed(1, 3).unwrap();
        assert_eq!(prediction.value, 2.5);
        assert_eq!(prediction.source, PredictionSource::ColdStart);
    }

    #[test]
    fn test_negative_weight_sum_does_not_fall_back() {
        let mut store = RatingStore::new();
        store.add_item(1, "A").unwrap();
        store.add_item(2, "B").unwrap();
        store.add_observation(1, 1, 5.0).unwrap();
        store.add_observation(1, 2, 0.5).unwrap();
        store.add_observation(2, 1, 4.0).unwrap();

        let scale = RatingScale {
            half_scale_width: 2.0,
            ..RatingScale::reference()
        };
        let mut predictor = Predictor::new(&mut store, &scale);

        // sim(2,1) = 1 - 4.5/2.0 = -1.25; -1.25 * 4.0 / -1.25 = 4.0
        let prediction = predictor.predict_detailed(2, 2).unwrap();
        assert_eq!(prediction.source, PredictionSource::Weighted);
        assert!((prediction.value - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_opposite_similarities_cancel_to_cold_start() {
        let mut store = RatingStore::new();
        for id in 1..=3 {
            store.add_item(id, format!("Item {}", id)).unwrap();
        }
        store.add_observation(1, 3, 4.0).unwrap();
        store.add_observation(1, 1, 3.0).unwrap();
        store.add_observation(2, 3, 4.0).unwrap();
        store.add_observation(2, 2, 1.0).unwrap();
        store.add_observation(9, 1, 4.0).unwrap();
        store.add_observation(9, 2, 2.0).unwrap();

        let scale = RatingScale {
            half_scale_width: 2.0,
            ..RatingScale::reference()
        };
        let mut predictor = Predictor::new(&mut store, &scale);

        // sim(3,1) = 1 - 1/2 = 0.5, sim(3,2) = 1 - 3/2 = -0.5
        let prediction = predictor.predict_detailed(9, 3).unwrap();
        assert_eq!(
            prediction,
            Prediction {
                value: 2.5,
                source: PredictionSource::ColdStart
            }
        );

        let target = predictor.store().item(3).unwrap();
        assert_eq!(target.cached_similarity(1), Some(0.5));
        assert_eq!(target.cached_similarity(2), Some(-0.5));
    }

    #[test]
    fn test_custom_cold_start_rating() {
        let mut store = scenario_store();
        store.add_item(3, "C").unwrap();
        let scale = RatingScale::from_bounds(1.0, 10.0);
        let mut predictor = Predictor::new(&mut store, &scale);

        assert_eq!(predictor.predict(1, 3).unwrap(), 5.5);
    }

    #[test]
    fn test_unknown_user_and_item() {
        let mut store = scenario_store();
        let mut predictor = Predictor::new(&mut store, &RatingScale::reference());

        assert_eq!(predictor.predict(99, 1), Err(RecError::UnknownUser(99)));
        assert_eq!(predictor.predict(1, 99), Err(RecError::UnknownItem(99)));
        assert_eq!(predictor.predict(99, 99), Err(RecError::UnknownUser(99)));
    }
}
