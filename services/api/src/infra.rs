use chrono::{NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use sahulat::catalog::seed::{seed_records, SeedError};
use sahulat::catalog::{
    CategoryFilter, CatalogImporter, ScholarshipId, ScholarshipRecord, ScholarshipStatus,
};
use sahulat::error::AppError;
use sahulat::portal::{CatalogOrder, CatalogQuery, ProfileStore, ScholarshipStore, StoreError};
use sahulat::profile::{ProfileId, UserProfile};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
}

/// Stands in for the hosted catalog table. Rows keep insertion order, so
/// newest-first is the reverse of it.
pub(crate) struct InMemoryScholarshipStore {
    records: Mutex<Vec<ScholarshipRecord>>,
    next_id: AtomicU64,
}

impl InMemoryScholarshipStore {
    pub(crate) fn new(records: Vec<ScholarshipRecord>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|record| record.id.trim().parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            records: Mutex::new(records),
            next_id: AtomicU64::new(next_id),
        }
    }
}

fn is_active_row(record: &ScholarshipRecord) -> bool {
    match record.status.as_deref() {
        None => true,
        Some(status) => ScholarshipStatus::parse(status) == Some(ScholarshipStatus::Active),
    }
}

impl ScholarshipStore for InMemoryScholarshipStore {
    fn list(&self, query: CatalogQuery) -> Result<Vec<ScholarshipRecord>, StoreError> {
        let guard = lock(&self.records)?;
        let mut rows: Vec<ScholarshipRecord> = guard
            .iter()
            .filter(|record| !query.active_only || is_active_row(record))
            .cloned()
            .collect();
        match query.order {
            // ISO dates order lexically; the portal re-sorts on the parsed date.
            CatalogOrder::DeadlineAscending => rows.sort_by(|a, b| a.deadline.cmp(&b.deadline)),
            CatalogOrder::NewestFirst => rows.reverse(),
        }
        Ok(rows)
    }

    fn fetch(&self, id: &ScholarshipId) -> Result<Option<ScholarshipRecord>, StoreError> {
        let guard = lock(&self.records)?;
        Ok(guard.iter().find(|record| record.id == id.0).cloned())
    }

    fn insert(&self, mut record: ScholarshipRecord) -> Result<ScholarshipRecord, StoreError> {
        let mut guard = lock(&self.records)?;
        if record.id.trim().is_empty() {
            record.id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        } else if guard.iter().any(|existing| existing.id == record.id) {
            return Err(StoreError::Conflict);
        }
        record.created_at = Some(Utc::now());
        guard.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: ScholarshipRecord) -> Result<(), StoreError> {
        let mut guard = lock(&self.records)?;
        let existing = guard
            .iter_mut()
            .find(|existing| existing.id == record.id)
            .ok_or(StoreError::NotFound)?;
        *existing = record;
        Ok(())
    }

    fn delete(&self, id: &ScholarshipId) -> Result<(), StoreError> {
        let mut guard = lock(&self.records)?;
        let position = guard
            .iter()
            .position(|record| record.id == id.0)
            .ok_or(StoreError::NotFound)?;
        guard.remove(position);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryProfileStore {
    profiles: Mutex<HashMap<ProfileId, UserProfile>>,
}

impl ProfileStore for InMemoryProfileStore {
    fn fetch(&self, id: &ProfileId) -> Result<Option<UserProfile>, StoreError> {
        let guard = lock(&self.profiles)?;
        Ok(guard.get(id).cloned())
    }

    fn upsert(&self, profile: UserProfile) -> Result<UserProfile, StoreError> {
        let mut guard = lock(&self.profiles)?;
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn delete(&self, id: &ProfileId) -> Result<(), StoreError> {
        let mut guard = lock(&self.profiles)?;
        guard.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

/// Rows from a catalog export when a path is given, otherwise the built-in seed.
pub(crate) fn load_catalog_records(path: Option<&Path>) -> Result<Vec<ScholarshipRecord>, AppError> {
    match path {
        Some(path) => {
            let records = CatalogImporter::from_path(path)?;
            info!(path = %path.display(), count = records.len(), "catalog export loaded");
            Ok(records)
        }
        None => {
            let records = seed_records().map_err(SeedError::from)?;
            info!(count = records.len(), "built-in seed catalog loaded");
            Ok(records)
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_category_filter(raw: &str) -> Result<CategoryFilter, String> {
    CategoryFilter::parse(raw).ok_or_else(|| {
        format!("unknown category '{raw}' (expected all, international, need-based, merit, or special)")
    })
}
