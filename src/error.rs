//! Error types for the rating predictor core.
//!
//! Loader, configuration and CLI code wrap these in `anyhow::Error` with
//! line or path context; the core itself only ever returns [`RecError`].

use crate::models::{ItemId, UserId};
use thiserror::Error;

/// Failures raised by the store, the similarity cache, the predictor and
/// the batch evaluator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecError {
    /// Item id is not in the catalog.
    #[error("unknown item id {0}")]
    UnknownItem(ItemId),

    /// User id has no stored observations.
    #[error("unknown user id {0}")]
    UnknownUser(UserId),

    /// Catalog already holds an entry for this id.
    #[error("item id {0} is already in the catalog")]
    DuplicateItem(ItemId),

    /// Rating is NaN or infinite.
    #[error("invalid rating {rating} for user {user_id}, item {item_id}")]
    InvalidRating {
        user_id: UserId,
        item_id: ItemId,
        rating: f64,
    },

    /// Correlation inputs have different lengths.
    #[error("length mismatch: {predicted} predicted values vs {actual} actual values")]
    LengthMismatch { predicted: usize, actual: usize },

    /// Correlation needs at least two points.
    #[error("correlation needs at least 2 points, got {len}")]
    InsufficientData { len: usize },

    /// A correlation input holds NaN or an infinity.
    #[error("correlation is undefined: {which} values contain NaN or infinity")]
    NonFiniteValue { which: &'static str },

    /// One of the correlation inputs is constant, so the coefficient is undefined.
    #[error("correlation is undefined: {which} values have zero variance")]
    ZeroVariance { which: &'static str },
}

pub type Result<T> = std::result::Result<T, RecError>;
