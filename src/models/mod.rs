use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;
use chrono::{DateTime, Utc};

pub type UserId = u64;
pub type ItemId = u64;

/// One row of the catalog stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub item_id: ItemId,
    pub title: String,
}

/// One user's rating of one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub rating: f64,
}

/// A catalogued item together with its raters and its similarity memo.
///
/// `users` and `similarities` are ordered so that every sum over them runs
/// in the same order on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub users: BTreeSet<UserId>,
    pub similarities: BTreeMap<ItemId, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    /// The user already rated the item.
    Recalled,
    /// Similarity-weighted average over the user's history.
    Weighted,
    /// No similarity evidence; the configured fallback was used.
    ColdStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub value: f64,
    pub source: PredictionSource,
}

/// Result row of a batch run: (user, item title, predicted, actual).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub user_id: UserId,
    pub title: String,
    pub predicted: f64,
    pub actual: f64,
    pub source: PredictionSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub run_id: Uuid,
    pub predictions: Vec<PredictionRecord>,
    /// `None` when Pearson r is undefined (fewer than 2 rows, or a constant side).
    pub correlation: Option<f64>,
    /// `None` only for an empty batch.
    pub mean_absolute_error: Option<f64>,
    pub root_mean_squared_error: Option<f64>,
    pub recalled: usize,
    pub weighted: usize,
    pub cold_starts: usize,
    pub similarity_computations: u64,
    pub generated_at: DateTime<Utc>,
}

impl Observation {
    pub fn new(user_id: UserId, item_id: ItemId, rating: f64) -> Self {
        Self {
            user_id,
            item_id,
            rating,
        }
    }
}

impl CatalogEntry {
    pub fn new(item_id: ItemId, title: impl Into<String>) -> Self {
        Self {
            item_id,
            title: title.into(),
        }
    }
}

impl Item {
    pub fn new(id: ItemId, title: String) -> Self {
        Self {
            id,
            title,
            users: BTreeSet::new(),
            similarities: BTreeMap::new(),
        }
    }

    pub fn cached_similarity(&self, other: ItemId) -> Option<f64> {
        self.similarities.get(&other).copied()
    }
}

impl PredictionRecord {
    /// The `(user, title, predicted, actual)` view of this record.
    pub fn as_tuple(&self) -> (UserId, &str, f64, f64) {
        (self.user_id, self.title.as_str(), self.predicted, self.actual)
    }
}
