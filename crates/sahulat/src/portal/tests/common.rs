use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::catalog::seed::seed_records;
use crate::catalog::{ScholarshipId, ScholarshipRecord};
use crate::portal::repository::{
    CatalogOrder, CatalogQuery, ProfileStore, ScholarshipStore, StoreError,
};
use crate::portal::{portal_router, ScholarshipPortal};
use crate::profile::{ProfileId, UserProfile};

pub(super) fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid timestamp")
}

pub(super) fn sindh_student() -> UserProfile {
    let mut profile = UserProfile::registered(
        ProfileId("u-sindh".to_string()),
        "Sana Memon",
        "sana@example.pk",
    );
    profile.province = "Sindh".to_string();
    profile.gpa = 3.2;
    profile.family_income = 55_000;
    profile
}

/// Seeded catalog; ignores the query's `active_only` so the portal's own filtering is exercised.
#[derive(Clone)]
pub(super) struct MemoryScholarshipStore {
    pub(super) records: Arc<Mutex<Vec<ScholarshipRecord>>>,
    pub(super) last_query: Arc<Mutex<Option<CatalogQuery>>>,
}

impl MemoryScholarshipStore {
    pub(super) fn seeded() -> Self {
        Self::with_records(seed_records().expect("seed parses"))
    }

    pub(super) fn with_records(records: Vec<ScholarshipRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            last_query: Arc::new(Mutex::new(None)),
        }
    }

    pub(super) fn set_status(&self, id: &str, status: &str) {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if let Some(record) = guard.iter_mut().find(|record| record.id == id) {
            record.status = Some(status.to_string());
        }
    }
}

impl ScholarshipStore for MemoryScholarshipStore {
    fn list(&self, query: CatalogQuery) -> Result<Vec<ScholarshipRecord>, StoreError> {
        *self.last_query.lock().expect("store mutex poisoned") = Some(query);
        let mut records = self.records.lock().expect("store mutex poisoned").clone();
        if query.order == CatalogOrder::NewestFirst {
            records.reverse();
        }
        Ok(records)
    }

    fn fetch(&self, id: &ScholarshipId) -> Result<Option<ScholarshipRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.iter().find(|record| record.id == id.0).cloned())
    }

    fn insert(&self, mut record: ScholarshipRecord) -> Result<ScholarshipRecord, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        record.id = format!("{}", guard.len() + 100);
        guard.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: ScholarshipRecord) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn delete(&self, id: &ScholarshipId) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let before = guard.len();
        guard.retain(|record| record.id != id.0);
        if guard.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProfileStore {
    pub(super) profiles: Arc<Mutex<HashMap<ProfileId, UserProfile>>>,
}

impl MemoryProfileStore {
    pub(super) fn with(profile: UserProfile) -> Self {
        let store = Self::default();
        store
            .profiles
            .lock()
            .expect("profile mutex poisoned")
            .insert(profile.id.clone(), profile);
        store
    }
}

impl ProfileStore for MemoryProfileStore {
    fn fetch(&self, id: &ProfileId) -> Result<Option<UserProfile>, StoreError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn upsert(&self, profile: UserProfile) -> Result<UserProfile, StoreError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn delete(&self, id: &ProfileId) -> Result<(), StoreError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

pub(super) struct UnavailableStore;

impl ScholarshipStore for UnavailableStore {
    fn list(&self, _query: CatalogQuery) -> Result<Vec<ScholarshipRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ScholarshipId) -> Result<Option<ScholarshipRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _record: ScholarshipRecord) -> Result<ScholarshipRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ScholarshipRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &ScholarshipId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) type MemoryPortal = ScholarshipPortal<MemoryScholarshipStore, MemoryProfileStore>;

pub(super) fn build_portal() -> (MemoryPortal, MemoryScholarshipStore, MemoryProfileStore) {
    let scholarships = MemoryScholarshipStore::seeded();
    let profiles = MemoryProfileStore::with(sindh_student());
    let portal = ScholarshipPortal::new(Arc::new(scholarships.clone()), Arc::new(profiles.clone()));
    (portal, scholarships, profiles)
}

pub(super) fn router_with_portal(portal: MemoryPortal) -> axum::Router {
    portal_router(Arc::new(portal))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
