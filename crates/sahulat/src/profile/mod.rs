//! Student profiles: the attributes the matching engine reads, plus the
//! edit form that produces them.

use crate::catalog::is_recognized_province;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileId(pub String);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DegreeLevel {
    Matriculation,
    Intermediate,
    #[serde(rename = "Bachelor's")]
    Bachelors,
    #[serde(rename = "Master's")]
    Masters,
    #[serde(rename = "PhD")]
    Phd,
}

impl DegreeLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Matriculation => "Matriculation",
            Self::Intermediate => "Intermediate",
            Self::Bachelors => "Bachelor's",
            Self::Masters => "Master's",
            Self::Phd => "PhD",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: ProfileId,
    pub full_name: String,
    pub email: String,
    pub province: String,
    pub current_degree: DegreeLevel,
    /// 0.0 to 4.0 scale.
    pub gpa: f64,
    /// Monthly household income in PKR.
    pub family_income: i64,
    pub is_orphan: bool,
    pub is_zakat_eligible: bool,
}

impl UserProfile {
    pub const DEFAULT_PROVINCE: &'static str = "Punjab";
    pub const DEFAULT_GPA: f64 = 3.0;
    pub const DEFAULT_FAMILY_INCOME: i64 = 30_000;

    /// Profile created on sign-up, before the student fills anything in.
    pub fn registered(id: ProfileId, full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            email: email.into(),
            province: Self::DEFAULT_PROVINCE.to_string(),
            current_degree: DegreeLevel::Bachelors,
            gpa: Self::DEFAULT_GPA,
            family_income: Self::DEFAULT_FAMILY_INCOME,
            is_orphan: false,
            is_zakat_eligible: false,
        }
    }

    pub fn draft(&self) -> ProfileDraft {
        ProfileDraft {
            full_name: self.full_name.clone(),
            province: self.province.clone(),
            current_degree: self.current_degree,
            gpa: self.gpa,
            family_income: self.family_income,
            is_orphan: self.is_orphan,
            is_zakat_eligible: self.is_zakat_eligible,
        }
    }
}

/// Mutable copy edited on the profile page. Only a validated draft
/// replaces the stored profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub full_name: String,
    pub province: String,
    pub current_degree: DegreeLevel,
    pub gpa: f64,
    pub family_income: i64,
    #[serde(default)]
    pub is_orphan: bool,
    #[serde(default)]
    pub is_zakat_eligible: bool,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileValidationError {
    #[error("full name is required")]
    MissingName,
    #[error("GPA {0} is outside 0.0 to 4.0")]
    GpaOutOfRange(f64),
    #[error("family income cannot be negative (got {0})")]
    NegativeIncome(i64),
    #[error("'{0}' is not a recognised province")]
    UnknownProvince(String),
}

impl ProfileDraft {
    pub fn validate(self, existing: &UserProfile) -> Result<UserProfile, ProfileValidationError> {
        let full_name = self.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(ProfileValidationError::MissingName);
        }
        if !self.gpa.is_finite() || !(0.0..=4.0).contains(&self.gpa) {
            return Err(ProfileValidationError::GpaOutOfRange(self.gpa));
        }
        if self.family_income < 0 {
            return Err(ProfileValidationError::NegativeIncome(self.family_income));
        }
        let province = self.province.trim().to_string();
        if !is_recognized_province(&province) {
            return Err(ProfileValidationError::UnknownProvince(province));
        }

        Ok(UserProfile {
            id: existing.id.clone(),
            full_name,
            email: existing.email.clone(),
            province,
            current_degree: self.current_degree,
            gpa: self.gpa,
            family_income: self.family_income,
            is_orphan: self.is_orphan,
            is_zakat_eligible: self.is_zakat_eligible,
        })
    }
}
