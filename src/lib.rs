pub mod config;
pub mod models;
pub mod services;
pub mod algorithms;
pub mod utils;
pub mod error;
pub mod io;

pub use config::{Config, RatingScale};
pub use models::*;
pub use services::evaluation::BatchEvaluator;
pub use services::rating_store::RatingStore;
pub use algorithms::{MeanAbsoluteDifference, Predictor, SimilarityCache, SimilarityMetric};
pub use error::RecError;

pub fn init_tracing() {
    // A second call (e.g. from several tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
