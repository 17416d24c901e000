use crate::catalog::{ScholarshipId, ScholarshipRecord};
use crate::profile::{ProfileId, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogOrder {
    #[default]
    DeadlineAscending,
    NewestFirst,
}

/// Server-side filtering the catalog source is asked for. Implementations
/// may ignore it; the portal re-filters and re-sorts what comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogQuery {
    pub active_only: bool,
    pub order: CatalogOrder,
}

impl CatalogQuery {
    pub fn listing() -> Self {
        Self {
            active_only: true,
            order: CatalogOrder::DeadlineAscending,
        }
    }

    pub fn admin() -> Self {
        Self {
            active_only: false,
            order: CatalogOrder::NewestFirst,
        }
    }
}

/// External catalog source.
pub trait ScholarshipStore: Send + Sync {
    fn list(&self, query: CatalogQuery) -> Result<Vec<ScholarshipRecord>, StoreError>;
    fn fetch(&self, id: &ScholarshipId) -> Result<Option<ScholarshipRecord>, StoreError>;
    /// Persists a new row and returns it with the store-assigned id.
    fn insert(&self, record: ScholarshipRecord) -> Result<ScholarshipRecord, StoreError>;
    fn update(&self, record: ScholarshipRecord) -> Result<(), StoreError>;
    fn delete(&self, id: &ScholarshipId) -> Result<(), StoreError>;
}

/// Identity provider's profile table.
pub trait ProfileStore: Send + Sync {
    fn fetch(&self, id: &ProfileId) -> Result<Option<UserProfile>, StoreError>;
    fn upsert(&self, profile: UserProfile) -> Result<UserProfile, StoreError>;
    fn delete(&self, id: &ProfileId) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
