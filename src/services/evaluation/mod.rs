use crate::algorithms::{MeanAbsoluteDifference, Predictor, SimilarityMetric};
use crate::config::RatingScale;
use crate::error::Result;
use crate::models::*;
use crate::services::rating_store::RatingStore;
use crate::utils::metrics::{pearson_correlation, AccuracyMetrics};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

/// Runs the predictor over held-out observations and scores the result.
///
/// Any unknown user or item in the batch aborts the whole run.
pub struct BatchEvaluator<'s, M = MeanAbsoluteDifference> {
    predictor: Predictor<'s, M>,
}

impl<'s> BatchEvaluator<'s> {
    pub fn new(store: &'s mut RatingStore, scale: &RatingScale) -> Self {
        Self::with_predictor(Predictor::new(store, scale))
    }

    pub fn correlation(predicted: &[f64], actual: &[f64]) -> Result<f64> {
        pearson_correlation(predicted, actual)
    }
}

impl<'s, M: SimilarityMetric> BatchEvaluator<'s, M> {
    pub fn with_predictor(predictor: Predictor<'s, M>) -> Self {
        Self { predictor }
    }

    /// One record per observation, in input order.
    pub fn predict_all(&mut self, observations: &[Observation]) -> Result<Vec<PredictionRecord>> {
        let mut records = Vec::with_capacity(observations.len());

        for observation in observations {
            let prediction = self
                .predictor
                .predict_detailed(observation.user_id, observation.item_id)?;
            let title = self.predictor.store().title_of(observation.item_id)?;

            debug!(
                "user {} item {}: predicted {} ({:?}), actual {}",
                observation.user_id, observation.item_id, prediction.value, prediction.source, observation.rating
            );

            records.push(PredictionRecord {
                user_id: observation.user_id,
                title: title.to_string(),
                predicted: prediction.value,
                actual: observation.rating,
                source: prediction.source,
            });
        }

        Ok(records)
    }

    /// Predicts every observation and scores the batch.
    ///
    /// Only an unknown user or item fails the run. A batch too small or too
    /// uniform for a correlation still returns all of its predictions, with
    /// `correlation` left as `None`.
    pub fn evaluate(&mut self, observations: &[Observation]) -> Result<EvaluationReport> {
        let run_id = Uuid::new_v4();
        info!("Evaluation run {} started over {} observations", run_id, observations.len());

        let predictions = self.predict_all(observations)?;
        let predicted: Vec<f64> = predictions.iter().map(|p| p.predicted).collect();
        let actual: Vec<f64> = predictions.iter().map(|p| p.actual).collect();
        let metrics = AccuracyMetrics::compute(&predicted, &actual)?;

        let count = |source: PredictionSource| predictions.iter().filter(|p| p.source == source).count();
        let recalled = count(PredictionSource::Recalled);
        let weighted = count(PredictionSource::Weighted);
        let cold_starts = count(PredictionSource::ColdStart);
        let similarity_computations = self.predictor.cache().computations();

        info!(
            "Evaluation run {} finished: correlation {:?}, MAE {:?}, RMSE {:?} \
             ({} recalled, {} weighted, {} cold starts, {} similarities computed)",
            run_id,
            metrics.correlation,
            metrics.mean_absolute_error,
            metrics.root_mean_squared_error,
            recalled,
            weighted,
            cold_starts,
            similarity_computations
        );

        Ok(EvaluationReport {
            run_id,
            predictions,
            correlation: metrics.correlation,
            mean_absolute_error: metrics.mean_absolute_error,
            root_mean_squared_error: metrics.root_mean_squared_error,
            recalled,
            weighted,
            cold_starts,
            similarity_computations,
            generated_at: Utc::now(),
        })
    }

    pub fn predictor(&self) -> &Predictor<'s, M> {
        &self.predictor
    }
}
