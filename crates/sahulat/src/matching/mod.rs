//! Eligibility matching and deadline urgency.
//!
//! Matching is binary: a scholarship is either fully eligible for a profile
//! or it is not. [`assess`] exists so callers can explain a rejection, not
//! to rank results.

pub mod deadline;
pub mod recommendations;
pub mod rules;

pub use deadline::{
    days_until_deadline, is_expired, is_urgent, is_warning, DeadlineStatus, DeadlineUrgency,
};
pub use recommendations::{ApproachingDeadline, Recommendations};
pub use rules::{
    meets_gpa, orphan_quota_satisfied, province_allowed, within_income, zakat_satisfied,
};

use crate::catalog::{Scholarship, ScholarshipId};
use crate::profile::UserProfile;
use serde::Serialize;

/// Scholarships whose every requirement the profile satisfies, in input order.
pub fn compute_eligibility(scholarships: &[Scholarship], profile: &UserProfile) -> Vec<Scholarship> {
    scholarships
        .iter()
        .filter(|scholarship| rules::all_satisfied(scholarship, profile))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityCriterion {
    MinimumGpa,
    IncomeCeiling,
    Province,
    ZakatEligibility,
    OrphanQuota,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmetCriterion {
    pub criterion: EligibilityCriterion,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityAssessment {
    pub scholarship_id: ScholarshipId,
    pub eligible: bool,
    pub unmet: Vec<UnmetCriterion>,
}

pub fn assess(scholarship: &Scholarship, profile: &UserProfile) -> EligibilityAssessment {
    let mut unmet = Vec::new();

    if !meets_gpa(scholarship, profile) {
        unmet.push(UnmetCriterion {
            criterion: EligibilityCriterion::MinimumGpa,
            note: format!(
                "GPA {:.2} below required {:.2}",
                profile.gpa, scholarship.min_gpa
            ),
        });
    }
    if !within_income(scholarship, profile) {
        unmet.push(UnmetCriterion {
            criterion: EligibilityCriterion::IncomeCeiling,
            note: format!(
                "family income PKR {} exceeds ceiling PKR {}",
                profile.family_income, scholarship.max_income
            ),
        });
    }
    if !province_allowed(scholarship, profile) {
        unmet.push(UnmetCriterion {
            criterion: EligibilityCriterion::Province,
            note: format!("not open to applicants from {}", profile.province),
        });
    }
    if !zakat_satisfied(scholarship, profile) {
        unmet.push(UnmetCriterion {
            criterion: EligibilityCriterion::ZakatEligibility,
            note: "restricted to zakat-eligible applicants".to_string(),
        });
    }
    if !orphan_quota_satisfied(scholarship, profile) {
        unmet.push(UnmetCriterion {
            criterion: EligibilityCriterion::OrphanQuota,
            note: "reserved for the orphan quota".to_string(),
        });
    }

    EligibilityAssessment {
        scholarship_id: scholarship.id.clone(),
        eligible: unmet.is_empty(),
        unmet,
    }
}
