use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scale: RatingScale,
    pub data: DataConfig,
    pub output: OutputConfig,
}

/// Bounds of the rating scale and the two constants derived from it.
///
/// The default is the reference 0.5–5.0 star scale: ratings are divided by a
/// half-scale width of 4.5 when turned into a similarity, and a prediction
/// with no similarity evidence falls back to 2.5.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingScale {
    pub min_rating: f64,
    pub max_rating: f64,
    pub half_scale_width: f64,
    pub cold_start_rating: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub movies_path: Option<PathBuf>,
    pub training_path: Option<PathBuf>,
    pub test_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl Default for RatingScale {
    fn default() -> Self {
        Self::reference()
    }
}

impl RatingScale {
    pub const fn reference() -> Self {
        Self {
            min_rating: 0.5,
            max_rating: 5.0,
            half_scale_width: 4.5,
            cold_start_rating: 2.5,
        }
    }

    /// Derives both constants from the bounds: the width is `max - min` and
    /// the fallback is the midpoint.
    ///
    /// `from_bounds(0.5, 5.0)` yields a fallback of 2.75, not the reference
    /// 2.5; use [`RatingScale::reference`] to reproduce reference results.
    pub fn from_bounds(min_rating: f64, max_rating: f64) -> Self {
        Self {
            min_rating,
            max_rating,
            half_scale_width: max_rating - min_rating,
            cold_start_rating: (min_rating + max_rating) / 2.0,
        }
    }

    pub fn contains(&self, rating: f64) -> bool {
        rating >= self.min_rating && rating <= self.max_rating
    }

    pub fn validate(&self) -> Result<()> {
        let values = [
            self.min_rating,
            self.max_rating,
            self.half_scale_width,
            self.cold_start_rating,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(anyhow!("Rating scale contains non-finite values: {:?}", self));
        }

        if self.min_rating >= self.max_rating {
            return Err(anyhow!(
                "Rating scale minimum ({}) must be below maximum ({})",
                self.min_rating,
                self.max_rating
            ));
        }

        if self.half_scale_width <= 0.0 {
            return Err(anyhow!(
                "Half-scale width must be positive, got {}",
                self.half_scale_width
            ));
        }

        Ok(())
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(
                config::Environment::with_prefix("SIMREC")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.scale.validate()?;
        Ok(config)
    }
}
