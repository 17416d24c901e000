use super::record::{
    decimal_field, normalize_all, whole_number_field, NormalizeError, ScholarshipRecord,
};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Export formats accepted for bulk catalog loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Csv,
}

impl CatalogFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    Normalize(NormalizeError),
    UnsupportedFormat(PathBuf),
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read catalog export: {}", err),
            CatalogImportError::Json(err) => write!(f, "invalid catalog JSON: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid catalog CSV: {}", err),
            CatalogImportError::Normalize(err) => {
                write!(f, "catalog export contains a bad record: {}", err)
            }
            CatalogImportError::UnsupportedFormat(path) => write!(
                f,
                "cannot infer catalog format for '{}' (expected .json or .csv)",
                path.display()
            ),
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Json(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::Normalize(err) => Some(err),
            CatalogImportError::UnsupportedFormat(_) => None,
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for CatalogImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<NormalizeError> for CatalogImportError {
    fn from(err: NormalizeError) -> Self {
        Self::Normalize(err)
    }
}

/// Loads store rows from an export. Every row is checked with `normalize`
/// before anything is returned, but the rows come back raw: they seed a
/// store, and the portal normalizes whatever the store hands it on read.
pub struct CatalogImporter;

impl CatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ScholarshipRecord>, CatalogImportError> {
        let path = path.as_ref();
        let format = CatalogFormat::from_path(path)
            .ok_or_else(|| CatalogImportError::UnsupportedFormat(path.to_path_buf()))?;
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, format)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        format: CatalogFormat,
    ) -> Result<Vec<ScholarshipRecord>, CatalogImportError> {
        let records = match format {
            CatalogFormat::Json => serde_json::from_reader(reader)?,
            CatalogFormat::Csv => parse_csv(reader)?,
        };

        // validation only; the normalized copies are not kept
        normalize_all(&records)?;
        debug!(count = records.len(), ?format, "catalog export loaded");
        Ok(records)
    }
}

fn parse_csv<R: Read>(reader: R) -> Result<Vec<ScholarshipRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<CatalogRow>() {
        records.push(ScholarshipRecord::from(row?));
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    provider: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    deadline: Option<String>,
    #[serde(default)]
    amount: String,
    #[serde(default)]
    official_link: String,
    #[serde(default)]
    provider_homepage: String,
    #[serde(default, deserialize_with = "decimal_field")]
    min_gpa: Option<f64>,
    #[serde(default, deserialize_with = "whole_number_field")]
    max_income: Option<i64>,
    #[serde(default)]
    allowed_provinces: Option<String>,
    #[serde(default, deserialize_with = "flag_field")]
    is_international: bool,
    #[serde(default, deserialize_with = "flag_field")]
    is_zakat_eligible: bool,
    #[serde(default, deserialize_with = "flag_field")]
    is_orphan_quota: bool,
    #[serde(default)]
    category: String,
    #[serde(default)]
    status: Option<String>,
}

impl From<CatalogRow> for ScholarshipRecord {
    fn from(row: CatalogRow) -> Self {
        let allowed_provinces = row
            .allowed_provinces
            .filter(|cell| !cell.trim().is_empty())
            .map(|cell| cell.split(';').map(|p| p.trim().to_string()).collect());

        ScholarshipRecord {
            id: row.id,
            title: row.title,
            provider: row.provider,
            description: row.description,
            deadline: row.deadline.filter(|value| !value.trim().is_empty()),
            amount: row.amount,
            official_link: row.official_link,
            provider_homepage: row.provider_homepage,
            min_gpa: row.min_gpa,
            max_income: row.max_income,
            allowed_provinces,
            is_international: row.is_international,
            is_zakat_eligible: row.is_zakat_eligible,
            is_orphan_quota: row.is_orphan_quota,
            category: row.category,
            status: row.status.filter(|value| !value.trim().is_empty()),
            created_at: None,
        }
    }
}

fn flag_field<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(|value| value.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(value) => match value.as_str() {
            "" | "false" | "no" | "n" | "0" => Ok(false),
            "true" | "yes" | "y" | "1" => Ok(true),
            _ => Err(serde::de::Error::custom(format!(
                "'{value}' is not a yes/no flag"
            ))),
        },
    }
}
