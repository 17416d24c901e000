use super::domain::{
    Category, Scholarship, ScholarshipId, ScholarshipStatus, PROVINCES,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Row shape used by the backing store and catalog exports.
///
/// Numeric thresholds may arrive as JSON numbers or numeric strings, and the
/// deadline as an ISO date, ISO date-time, or RFC 3339 timestamp. Nothing here
/// is trusted until it passes [`normalize`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScholarshipRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub deadline: Option<String>,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub official_link: String,
    #[serde(default)]
    pub provider_homepage: String,
    #[serde(default, deserialize_with = "decimal_field")]
    pub min_gpa: Option<f64>,
    #[serde(default, deserialize_with = "whole_number_field")]
    pub max_income: Option<i64>,
    #[serde(default)]
    pub allowed_provinces: Option<Vec<String>>,
    #[serde(default)]
    pub is_international: bool,
    #[serde(default)]
    pub is_zakat_eligible: bool,
    #[serde(default)]
    pub is_orphan_quota: bool,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("scholarship record is missing its id")]
    MissingId,
    #[error("scholarship {id} has no deadline")]
    MissingDeadline { id: ScholarshipId },
    #[error("scholarship {id} has an unparsable deadline '{value}'")]
    InvalidDeadline { id: ScholarshipId, value: String },
    #[error("scholarship {id} is missing {field}")]
    MissingThreshold {
        id: ScholarshipId,
        field: &'static str,
    },
    #[error("scholarship {id} has unknown category '{value}'")]
    UnknownCategory { id: ScholarshipId, value: String },
    #[error("scholarship {id} has unknown status '{value}'")]
    UnknownStatus { id: ScholarshipId, value: String },
    #[error("scholarship {id} lists no allowed provinces")]
    EmptyProvinces { id: ScholarshipId },
}

impl NormalizeError {
    pub fn scholarship_id(&self) -> Option<&ScholarshipId> {
        match self {
            NormalizeError::MissingId => None,
            NormalizeError::MissingDeadline { id }
            | NormalizeError::InvalidDeadline { id, .. }
            | NormalizeError::MissingThreshold { id, .. }
            | NormalizeError::UnknownCategory { id, .. }
            | NormalizeError::UnknownStatus { id, .. }
            | NormalizeError::EmptyProvinces { id } => Some(id),
        }
    }
}

/// Map a store row onto the canonical [`Scholarship`].
pub fn normalize(record: &ScholarshipRecord) -> Result<Scholarship, NormalizeError> {
    let id = record.id.trim();
    if id.is_empty() {
        return Err(NormalizeError::MissingId);
    }
    let id = ScholarshipId(id.to_string());

    let deadline = match record.deadline.as_deref().map(str::trim) {
        None | Some("") => return Err(NormalizeError::MissingDeadline { id }),
        Some(raw) => parse_deadline(raw).ok_or_else(|| NormalizeError::InvalidDeadline {
            id: id.clone(),
            value: raw.to_string(),
        })?,
    };

    let min_gpa = record.min_gpa.ok_or_else(|| NormalizeError::MissingThreshold {
        id: id.clone(),
        field: "min_gpa",
    })?;
    let max_income = record
        .max_income
        .ok_or_else(|| NormalizeError::MissingThreshold {
            id: id.clone(),
            field: "max_income",
        })?;

    let category =
        Category::parse(&record.category).ok_or_else(|| NormalizeError::UnknownCategory {
            id: id.clone(),
            value: record.category.clone(),
        })?;

    let status = match record.status.as_deref() {
        None => ScholarshipStatus::Active,
        Some(raw) => ScholarshipStatus::parse(raw).ok_or_else(|| NormalizeError::UnknownStatus {
            id: id.clone(),
            value: raw.to_string(),
        })?,
    };

    let allowed_provinces = match &record.allowed_provinces {
        None => PROVINCES.iter().map(|province| province.to_string()).collect(),
        Some(listed) => {
            let provinces = dedupe_provinces(listed);
            if provinces.is_empty() {
                return Err(NormalizeError::EmptyProvinces { id });
            }
            provinces
        }
    };

    Ok(Scholarship {
        id,
        title: record.title.trim().to_string(),
        provider: record.provider.trim().to_string(),
        description: record.description.trim().to_string(),
        deadline,
        amount: record.amount.trim().to_string(),
        official_link: record.official_link.trim().to_string(),
        provider_homepage: record.provider_homepage.trim().to_string(),
        min_gpa,
        max_income,
        allowed_provinces,
        is_international: record.is_international,
        is_zakat_eligible: record.is_zakat_eligible,
        is_orphan_quota: record.is_orphan_quota,
        category,
        status,
    })
}

/// Normalize a batch, stopping at the first bad record.
pub fn normalize_all<'a, I>(records: I) -> Result<Vec<Scholarship>, NormalizeError>
where
    I: IntoIterator<Item = &'a ScholarshipRecord>,
{
    records.into_iter().map(normalize).collect()
}

fn dedupe_provinces(listed: &[String]) -> Vec<String> {
    let mut provinces: Vec<String> = Vec::with_capacity(listed.len());
    for province in listed {
        let trimmed = province.trim();
        if trimmed.is_empty() || provinces.iter().any(|seen| seen == trimmed) {
            continue;
        }
        provinces.push(trimmed.to_string());
    }
    provinces
}

pub(crate) fn parse_deadline(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.date());
        }
    }

    None
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

pub(crate) fn decimal_field<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<NumberOrText>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(NumberOrText::Number(number)) => number,
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => return Ok(None),
        Some(NumberOrText::Text(text)) => text.trim().parse::<f64>().map_err(|_| {
            serde::de::Error::custom(format!("'{text}' is not a decimal number"))
        })?,
    };

    if value.is_finite() {
        Ok(Some(value))
    } else {
        Err(serde::de::Error::custom("threshold must be a finite number"))
    }
}

pub(crate) fn whole_number_field<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(number)) => whole_from_f64(number)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("{number} is not a whole number"))),
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(text)) => {
            let trimmed = text.trim();
            if let Ok(value) = trimmed.parse::<i64>() {
                return Ok(Some(value));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(whole_from_f64)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("'{text}' is not a whole number")))
        }
    }
}

fn whole_from_f64(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}
