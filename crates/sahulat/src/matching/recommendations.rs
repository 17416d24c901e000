use super::compute_eligibility;
use super::deadline::{days_until_deadline, WARNING_WITHIN_DAYS};
use crate::catalog::Scholarship;
use crate::profile::UserProfile;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Below this many matches the dashboard nudges the student to refine their profile.
pub const PROFILE_NUDGE_THRESHOLD: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApproachingDeadline {
    pub scholarship: Scholarship,
    pub days_remaining: i64,
}

/// Dashboard view for a signed-in student.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub matches: Vec<Scholarship>,
    pub approaching_deadlines: Vec<ApproachingDeadline>,
    pub suggest_profile_update: bool,
}

impl Recommendations {
    pub fn build(scholarships: &[Scholarship], profile: &UserProfile, now: NaiveDateTime) -> Self {
        let matches = compute_eligibility(scholarships, profile);

        let mut approaching_deadlines: Vec<ApproachingDeadline> = matches
            .iter()
            .filter_map(|scholarship| {
                let days_remaining = days_until_deadline(scholarship.deadline, now);
                (days_remaining > 0 && days_remaining <= WARNING_WITHIN_DAYS).then(|| {
                    ApproachingDeadline {
                        scholarship: scholarship.clone(),
                        days_remaining,
                    }
                })
            })
            .collect();
        approaching_deadlines.sort_by_key(|entry| entry.days_remaining);

        let suggest_profile_update =
            !matches.is_empty() && matches.len() < PROFILE_NUDGE_THRESHOLD;

        Self {
            matches,
            approaching_deadlines,
            suggest_profile_update,
        }
    }
}
