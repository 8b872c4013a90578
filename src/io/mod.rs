//! CSV loading for the catalog, training and test streams.
//!
//! Every file starts with a header row, which is skipped. Only the leading
//! columns are read (`item id, title` or `user id, item id, rating`), so
//! MovieLens-style files with trailing `genres` or `timestamp` columns load
//! unchanged.

use crate::config::RatingScale;
use crate::models::*;
use crate::services::rating_store::RatingStore;
use crate::utils::validation::{validate_catalog_entry, validate_observation};
use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fmt::Display;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or_default()
}

fn parse_field<T>(record: &StringRecord, index: usize, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let line = line_of(record);
    let raw = record
        .get(index)
        .ok_or_else(|| anyhow!("line {}: missing {} column", line, name))?;

    raw.parse::<T>()
        .map_err(|e| anyhow!("line {}: invalid {} {:?}: {}", line, name, raw, e))
}

pub fn read_catalog_from<R: Read>(reader: R) -> Result<Vec<CatalogEntry>> {
    let mut entries = Vec::new();

    for record in csv_reader(reader).records() {
        let record = record.context("Malformed catalog row")?;
        let entry = CatalogEntry {
            item_id: parse_field(&record, 0, "item id")?,
            title: parse_field(&record, 1, "title")?,
        };
        validate_catalog_entry(&entry).with_context(|| format!("line {}", line_of(&record)))?;
        entries.push(entry);
    }

    Ok(entries)
}

pub fn read_observations_from<R: Read>(reader: R, scale: &RatingScale) -> Result<Vec<Observation>> {
    let mut observations = Vec::new();

    for record in csv_reader(reader).records() {
        let record = record.context("Malformed rating row")?;
        let observation = Observation {
            user_id: parse_field(&record, 0, "user id")?,
            item_id: parse_field(&record, 1, "item id")?,
            rating: parse_field(&record, 2, "rating")?,
        };
        validate_observation(&observation, scale).with_context(|| format!("line {}", line_of(&record)))?;
        observations.push(observation);
    }

    Ok(observations)
}

pub fn read_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<CatalogEntry>> {
    let path = path.as_ref();
    let entries = read_catalog_from(open(path)?).with_context(|| format!("Failed to read catalog {}", path.display()))?;
    info!("Read {} catalog entries from {}", entries.len(), path.display());
    Ok(entries)
}

pub fn read_observations<P: AsRef<Path>>(path: P, scale: &RatingScale) -> Result<Vec<Observation>> {
    let path = path.as_ref();
    let observations = read_observations_from(open(path)?, scale)
        .with_context(|| format!("Failed to read ratings {}", path.display()))?;
    info!("Read {} observations from {}", observations.len(), path.display());
    Ok(observations)
}

/// Loads the catalog and the training observations into a fresh store.
pub fn load_store<P, Q>(movies_path: P, training_path: Q, scale: &RatingScale) -> Result<RatingStore>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let catalog = read_catalog(movies_path)?;
    let training = read_observations(training_path, scale)?;
    Ok(RatingStore::from_records(catalog, training)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVIES: &str = "movieId,title,genres\n\
        1,Toy Story (1995),Animation|Children\n\
        2,\"American President, The (1995)\",Comedy|Drama\n";

    const RATINGS: &str = "userId,movieId,rating,timestamp\n\
        1,1,4.0,964982703\n\
        1,2,3.5,964981247\n\
        2,1,5.0,964982224\n";

    #[test]
    fn test_read_catalog_skips_header_and_handles_quotes() {
        let entries = read_catalog_from(MOVIES.as_bytes()).unwrap();
        assert_eq!(
            entries,
            vec![
                CatalogEntry::new(1, "Toy Story (1995)"),
                CatalogEntry::new(2, "American President, The (1995)"),
            ]
        );
    }

    #[test]
    fn test_read_observations() {
        let observations = read_observations_from(RATINGS.as_bytes(), &RatingScale::reference()).unwrap();
        assert_eq!(observations.len(), 3);
        assert_eq!(observations[1], Observation::new(1, 2, 3.5));
    }

    #[test]
    fn test_malformed_rows_report_line() {
        let bad = "userId,movieId,rating\n1,1,4.0\n1,x,3.0\n";
        let err = read_observations_from(bad.as_bytes(), &RatingScale::reference()).unwrap_err();
        assert!(err.to_string().contains("line 3"), "{}", err);

        let missing = "userId,movieId,rating\n1,1\n";
        let err = read_observations_from(missing.as_bytes(), &RatingScale::reference()).unwrap_err();
        assert!(err.to_string().contains("missing rating"), "{}", err);
    }

    #[test]
    fn test_out_of_scale_rating_is_rejected() {
        let data = "userId,movieId,rating\n1,1,7.0\n";
        assert!(read_observations_from(data.as_bytes(), &RatingScale::reference()).is_err());
        assert!(read_observations_from(data.as_bytes(), &RatingScale::from_bounds(1.0, 10.0)).is_ok());
    }
}
