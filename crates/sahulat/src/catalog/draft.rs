use super::domain::{is_recognized_province, Category, ScholarshipStatus, PROVINCES};
use super::record::ScholarshipRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftValidationError {
    #[error("title is required")]
    MissingTitle,
    #[error("official application link is required")]
    MissingOfficialLink,
    #[error("deadline is required")]
    MissingDeadline,
    #[error("minimum GPA {0} is outside 0.0 to 4.0")]
    GpaOutOfRange(f64),
    #[error("maximum income cannot be negative (got {0})")]
    NegativeIncome(i64),
    #[error("at least one province must be allowed")]
    NoProvinces,
    #[error("'{0}' is not a recognised province")]
    UnknownProvince(String),
}

/// Admin "add scholarship" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScholarshipDraft {
    pub title: String,
    pub provider: String,
    pub description: String,
    pub deadline: Option<NaiveDate>,
    pub amount: String,
    pub official_link: String,
    pub provider_homepage: String,
    pub min_gpa: f64,
    pub max_income: i64,
    pub allowed_provinces: Vec<String>,
    pub is_international: bool,
    pub is_zakat_eligible: bool,
    pub is_orphan_quota: bool,
    pub category: Category,
}

impl Default for ScholarshipDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            provider: String::new(),
            description: String::new(),
            deadline: None,
            amount: String::new(),
            official_link: String::new(),
            provider_homepage: String::new(),
            min_gpa: 2.0,
            max_income: 50_000,
            allowed_provinces: PROVINCES.iter().map(|province| province.to_string()).collect(),
            is_international: false,
            is_zakat_eligible: false,
            is_orphan_quota: false,
            category: Category::NeedBased,
        }
    }
}

impl ScholarshipDraft {
    /// Validated store row without an id; the store assigns one on insert.
    pub fn into_record(self) -> Result<ScholarshipRecord, DraftValidationError> {
        let title = required(&self.title).ok_or(DraftValidationError::MissingTitle)?;
        let official_link =
            required(&self.official_link).ok_or(DraftValidationError::MissingOfficialLink)?;
        let deadline = self.deadline.ok_or(DraftValidationError::MissingDeadline)?;

        if !self.min_gpa.is_finite() || !(0.0..=4.0).contains(&self.min_gpa) {
            return Err(DraftValidationError::GpaOutOfRange(self.min_gpa));
        }
        if self.max_income < 0 {
            return Err(DraftValidationError::NegativeIncome(self.max_income));
        }

        let mut allowed_provinces: Vec<String> = Vec::new();
        for province in &self.allowed_provinces {
            let province = province.trim();
            if !is_recognized_province(province) {
                return Err(DraftValidationError::UnknownProvince(province.to_string()));
            }
            if !allowed_provinces.iter().any(|existing| existing == province) {
                allowed_provinces.push(province.to_string());
            }
        }
        if allowed_provinces.is_empty() {
            return Err(DraftValidationError::NoProvinces);
        }

        Ok(ScholarshipRecord {
            id: String::new(),
            title,
            provider: required(&self.provider).unwrap_or_else(|| "Unknown".to_string()),
            description: self.description.trim().to_string(),
            deadline: Some(deadline.format("%Y-%m-%d").to_string()),
            amount: required(&self.amount).unwrap_or_else(|| "Varies".to_string()),
            provider_homepage: required(&self.provider_homepage)
                .unwrap_or_else(|| official_link.clone()),
            official_link,
            min_gpa: Some(self.min_gpa),
            max_income: Some(self.max_income),
            allowed_provinces: Some(allowed_provinces),
            is_international: self.is_international,
            is_zakat_eligible: self.is_zakat_eligible,
            is_orphan_quota: self.is_orphan_quota,
            category: self.category.as_str().to_string(),
            status: Some(ScholarshipStatus::Active.as_str().to_string()),
            created_at: None,
        })
    }
}

/// Admin "edit scholarship" form. Thresholds are not editable here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScholarshipEdit {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub official_link: String,
    #[serde(default)]
    pub provider_homepage: String,
    pub status: ScholarshipStatus,
}

impl ScholarshipEdit {
    pub fn from_record(record: &ScholarshipRecord) -> Option<Self> {
        let status = match record.status.as_deref() {
            None => ScholarshipStatus::Active,
            Some(raw) => ScholarshipStatus::parse(raw)?,
        };
        Some(Self {
            title: record.title.clone(),
            description: record.description.clone(),
            official_link: record.official_link.clone(),
            provider_homepage: record.provider_homepage.clone(),
            status,
        })
    }

    /// Writes the edit onto `record`, leaving every other column untouched.
    pub fn apply_to(self, record: &mut ScholarshipRecord) -> Result<(), DraftValidationError> {
        let title = required(&self.title).ok_or(DraftValidationError::MissingTitle)?;
        record.title = title;
        record.description = self.description.trim().to_string();
        record.official_link = self.official_link.trim().to_string();
        record.provider_homepage = self.provider_homepage.trim().to_string();
        record.status = Some(self.status.as_str().to_string());
        Ok(())
    }
}

fn required(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
