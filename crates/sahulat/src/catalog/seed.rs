//! Built-in catalog used when no store export is configured.

use super::domain::Scholarship;
use super::record::{normalize_all, NormalizeError, ScholarshipRecord};

const SEED_EXPORT: &str = include_str!("../../data/seed_scholarships.json");

/// The seed set as store rows.
pub fn seed_records() -> Result<Vec<ScholarshipRecord>, serde_json::Error> {
    serde_json::from_str(SEED_EXPORT)
}

/// The seed set, normalized.
pub fn seed_catalog() -> Result<Vec<Scholarship>, SeedError> {
    let records = seed_records()?;
    Ok(normalize_all(&records)?)
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("seed catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("seed catalog failed normalization: {0}")]
    Normalize(#[from] NormalizeError),
}
