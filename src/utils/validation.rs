use crate::config::RatingScale;
use crate::models::*;
use anyhow::{anyhow, Result};

pub fn validate_catalog_entry(entry: &CatalogEntry) -> Result<()> {
    if entry.title.trim().is_empty() {
        return Err(anyhow!("Item {} has an empty title", entry.item_id));
    }

    Ok(())
}

pub fn validate_observation(observation: &Observation, scale: &RatingScale) -> Result<()> {
    if !observation.rating.is_finite() {
        return Err(anyhow!(
            "Rating for user {} item {} is not finite",
            observation.user_id,
            observation.item_id
        ));
    }

    if !scale.contains(observation.rating) {
        return Err(anyhow!(
            "Rating {} for user {} item {} is outside the scale [{}, {}]",
            observation.rating,
            observation.user_id,
            observation.item_id,
            scale.min_rating,
            scale.max_rating
        ));
    }

    Ok(())
}
