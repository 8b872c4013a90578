pub mod predictor;
pub mod similarity;

pub use predictor::Predictor;
pub use similarity::SimilarityCache;

use crate::config::RatingScale;
use crate::utils::mean_absolute_difference;

/// Scores how alike two items are from the ratings of their shared raters.
///
/// `pairs` holds one `(rating of a, rating of b)` tuple per user who rated
/// both items. An empty slice means there is no shared evidence.
pub trait SimilarityMetric {
    fn score(&self, pairs: &[(f64, f64)]) -> f64;
}

/// `1 - mean(|r_a - r_b|) / half_scale_width`, or 0 with no shared raters.
///
/// Not clamped: strongly divergent raters drive the score below zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanAbsoluteDifference {
    pub half_scale_width: f64,
}

impl MeanAbsoluteDifference {
    pub fn new(half_scale_width: f64) -> Self {
        Self { half_scale_width }
    }
}

impl Default for MeanAbsoluteDifference {
    fn default() -> Self {
        Self::from(&RatingScale::reference())
    }
}

impl From<&RatingScale> for MeanAbsoluteDifference {
    fn from(scale: &RatingScale) -> Self {
        Self::new(scale.half_scale_width)
    }
}

impl SimilarityMetric for MeanAbsoluteDifference {
    fn score(&self, pairs: &[(f64, f64)]) -> f64 {
        match mean_absolute_difference(pairs.iter().copied()) {
            Some(mean) => 1.0 - mean / self.half_scale_width,
            None => 0.0,
        }
    }
}
