use crate::catalog::Scholarship;
use crate::profile::UserProfile;

/// Inclusive: a GPA equal to the minimum qualifies.
pub fn meets_gpa(scholarship: &Scholarship, profile: &UserProfile) -> bool {
    profile.gpa >= scholarship.min_gpa
}

/// Inclusive: income equal to the ceiling qualifies.
pub fn within_income(scholarship: &Scholarship, profile: &UserProfile) -> bool {
    profile.family_income <= scholarship.max_income
}

pub fn province_allowed(scholarship: &Scholarship, profile: &UserProfile) -> bool {
    scholarship.allows_province(&profile.province)
}

pub fn zakat_satisfied(scholarship: &Scholarship, profile: &UserProfile) -> bool {
    !scholarship.is_zakat_eligible || profile.is_zakat_eligible
}

pub fn orphan_quota_satisfied(scholarship: &Scholarship, profile: &UserProfile) -> bool {
    !scholarship.is_orphan_quota || profile.is_orphan
}

pub(crate) fn all_satisfied(scholarship: &Scholarship, profile: &UserProfile) -> bool {
    meets_gpa(scholarship, profile)
        && within_income(scholarship, profile)
        && province_allowed(scholarship, profile)
        && zakat_satisfied(scholarship, profile)
        && orphan_quota_satisfied(scholarship, profile)
}
