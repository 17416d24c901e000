//! Portal service: wires the catalog source and profile store to the pure
//! catalog and matching functions, and exposes them over HTTP.

pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use repository::{CatalogOrder, CatalogQuery, ProfileStore, ScholarshipStore, StoreError};
pub use router::portal_router;
pub use service::{
    AdminCatalog, LinkReport, PortalError, Registration, ScholarshipCard, ScholarshipPortal,
};
