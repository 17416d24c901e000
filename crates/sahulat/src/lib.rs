//! Scholarship catalog, eligibility matching, and deadline urgency for the
//! Sahulat-e-Taleem portal.

pub mod catalog;
pub mod config;
pub mod error;
pub mod matching;
pub mod portal;
pub mod profile;
pub mod telemetry;
