use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::repository::{CatalogQuery, ProfileStore, ScholarshipStore, StoreError};
use crate::catalog::{
    admin_search, normalize, normalize_all, ApplicationTarget, CategoryCounts,
    DraftValidationError, ListingFilter, NormalizeError, Scholarship, ScholarshipDraft,
    ScholarshipEdit, ScholarshipId, ScholarshipRecord, ScholarshipStatus,
};
use crate::matching::{assess, DeadlineStatus, EligibilityAssessment, Recommendations};
use crate::profile::{ProfileDraft, ProfileId, ProfileValidationError, UserProfile};

/// Orchestrates the catalog source, the profile store, and the pure
/// matching functions for the portal's pages.
pub struct ScholarshipPortal<S, P> {
    scholarships: Arc<S>,
    profiles: Arc<P>,
}

/// Listing card: the scholarship plus everything derived for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScholarshipCard {
    pub scholarship: Scholarship,
    pub deadline: DeadlineStatus,
    pub apply: ApplicationTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminCatalog {
    pub total: usize,
    pub active: usize,
    pub scholarships: Vec<ScholarshipRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: ProfileId,
    pub full_name: String,
    pub email: String,
}

/// A visitor's report that a scholarship's application link is dead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub scholarship_id: ScholarshipId,
    pub title: String,
    pub url: String,
    pub reported_at: NaiveDateTime,
}

impl<S, P> ScholarshipPortal<S, P>
where
    S: ScholarshipStore + 'static,
    P: ProfileStore + 'static,
{
    pub fn new(scholarships: Arc<S>, profiles: Arc<P>) -> Self {
        Self {
            scholarships,
            profiles,
        }
    }

    /// Active scholarships ordered by deadline, soonest first.
    pub fn active_catalog(&self) -> Result<Vec<Scholarship>, PortalError> {
        let records = self.scholarships.list(CatalogQuery::listing())?;
        let mut catalog = normalize_all(&records).map_err(|err| {
            warn!(error = %err, "catalog source returned an unusable record");
            err
        })?;
        catalog.retain(Scholarship::is_active);
        catalog.sort_by_key(|scholarship| scholarship.deadline);
        Ok(catalog)
    }

    pub fn browse(
        &self,
        filter: &ListingFilter,
        now: NaiveDateTime,
    ) -> Result<Vec<ScholarshipCard>, PortalError> {
        let catalog = self.active_catalog()?;
        let cards = filter
            .apply(&catalog)
            .into_iter()
            .map(|scholarship| ScholarshipCard {
                deadline: DeadlineStatus::evaluate(scholarship.deadline, now),
                apply: scholarship.application_target(),
                scholarship: scholarship.clone(),
            })
            .collect();
        Ok(cards)
    }

    pub fn category_counts(&self) -> Result<CategoryCounts, PortalError> {
        Ok(CategoryCounts::tally(&self.active_catalog()?))
    }

    pub fn profile(&self, id: &ProfileId) -> Result<UserProfile, PortalError> {
        self.profiles
            .fetch(id)?
            .ok_or_else(|| PortalError::ProfileNotFound(id.clone()))
    }

    pub fn recommendations(
        &self,
        id: &ProfileId,
        now: NaiveDateTime,
    ) -> Result<Recommendations, PortalError> {
        let profile = self.profile(id)?;
        let catalog = self.active_catalog()?;
        Ok(Recommendations::build(&catalog, &profile, now))
    }

    /// One assessment per active scholarship, in catalog order.
    pub fn eligibility(&self, id: &ProfileId) -> Result<Vec<EligibilityAssessment>, PortalError> {
        let profile = self.profile(id)?;
        let catalog = self.active_catalog()?;
        Ok(catalog
            .iter()
            .map(|scholarship| assess(scholarship, &profile))
            .collect())
    }

    pub fn register_profile(&self, registration: Registration) -> Result<UserProfile, PortalError> {
        if registration.full_name.trim().is_empty() {
            return Err(ProfileValidationError::MissingName.into());
        }
        if self.profiles.fetch(&registration.id)?.is_some() {
            return Err(StoreError::Conflict.into());
        }

        let profile = UserProfile::registered(
            registration.id,
            registration.full_name.trim(),
            registration.email.trim(),
        );
        let stored = self.profiles.upsert(profile)?;
        info!(profile_id = %stored.id, "profile registered");
        Ok(stored)
    }

    pub fn save_profile(
        &self,
        id: &ProfileId,
        draft: ProfileDraft,
    ) -> Result<UserProfile, PortalError> {
        let existing = self.profile(id)?;
        let updated = draft.validate(&existing)?;
        let stored = self.profiles.upsert(updated)?;
        info!(profile_id = %stored.id, province = %stored.province, "profile saved");
        Ok(stored)
    }

    pub fn delete_profile(&self, id: &ProfileId) -> Result<(), PortalError> {
        match self.profiles.delete(id) {
            Ok(()) => {
                info!(profile_id = %id, "profile deleted");
                Ok(())
            }
            Err(StoreError::NotFound) => Err(PortalError::ProfileNotFound(id.clone())),
            Err(other) => Err(other.into()),
        }
    }

    /// Every record regardless of status, newest first. Totals ignore the search.
    pub fn admin_catalog(&self, search: Option<&str>) -> Result<AdminCatalog, PortalError> {
        let records = self.scholarships.list(CatalogQuery::admin())?;
        let active = records
            .iter()
            .filter(|record| {
                record
                    .status
                    .as_deref()
                    .map_or(true, |status| {
                        ScholarshipStatus::parse(status) == Some(ScholarshipStatus::Active)
                    })
            })
            .count();
        let scholarships = admin_search(&records, search).into_iter().cloned().collect();

        Ok(AdminCatalog {
            total: records.len(),
            active,
            scholarships,
        })
    }

    pub fn create_scholarship(&self, draft: ScholarshipDraft) -> Result<Scholarship, PortalError> {
        let record = draft.into_record()?;
        let stored = self.scholarships.insert(record)?;
        let scholarship = normalize(&stored)?;
        info!(scholarship_id = %scholarship.id, title = %scholarship.title, "scholarship created");
        Ok(scholarship)
    }

    pub fn update_scholarship(
        &self,
        id: &ScholarshipId,
        edit: ScholarshipEdit,
    ) -> Result<Scholarship, PortalError> {
        let mut record = self
            .scholarships
            .fetch(id)?
            .ok_or_else(|| PortalError::ScholarshipNotFound(id.clone()))?;
        edit.apply_to(&mut record)?;
        let scholarship = normalize(&record)?;
        self.scholarships.update(record)?;
        info!(
            scholarship_id = %scholarship.id,
            status = scholarship.status.as_str(),
            "scholarship updated"
        );
        Ok(scholarship)
    }

    pub fn delete_scholarship(&self, id: &ScholarshipId) -> Result<(), PortalError> {
        match self.scholarships.delete(id) {
            Ok(()) => {
                info!(scholarship_id = %id, "scholarship deleted");
                Ok(())
            }
            Err(StoreError::NotFound) => Err(PortalError::ScholarshipNotFound(id.clone())),
            Err(other) => Err(other.into()),
        }
    }

    /// Logged for operators only; nothing is persisted.
    pub fn report_broken_link(
        &self,
        id: &ScholarshipId,
        now: NaiveDateTime,
    ) -> Result<LinkReport, PortalError> {
        let record = self
            .scholarships
            .fetch(id)?
            .ok_or_else(|| PortalError::ScholarshipNotFound(id.clone()))?;
        let scholarship = normalize(&record)?;

        let report = LinkReport {
            url: scholarship.application_target().url,
            scholarship_id: scholarship.id,
            title: scholarship.title,
            reported_at: now,
        };
        warn!(
            scholarship_id = %report.scholarship_id,
            title = %report.title,
            url = %report.url,
            reported_at = %report.reported_at,
            "broken application link reported"
        );
        Ok(report)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("profile {0} not found")]
    ProfileNotFound(ProfileId),
    #[error("scholarship {0} not found")]
    ScholarshipNotFound(ScholarshipId),
    #[error(transparent)]
    Profile(#[from] ProfileValidationError),
    #[error(transparent)]
    Draft(#[from] DraftValidationError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
