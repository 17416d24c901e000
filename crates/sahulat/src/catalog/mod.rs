//! Scholarship catalog model: canonical records, normalization from store rows,
//! seed fixtures, bulk import, listing filters, and admin forms.

pub mod domain;
pub mod draft;
pub mod import;
pub mod record;
pub mod search;
pub mod seed;

pub use domain::{
    is_recognized_province, ApplicationTarget, ApplicationTargetKind, Category, Scholarship,
    ScholarshipId, ScholarshipStatus, PROVINCES,
};
pub use draft::{DraftValidationError, ScholarshipDraft, ScholarshipEdit};
pub use import::{CatalogFormat, CatalogImportError, CatalogImporter};
pub use record::{normalize, normalize_all, NormalizeError, ScholarshipRecord};
pub use search::{admin_search, CategoryFilter, ListingFilter};

use serde::Serialize;

/// Number of scholarships satisfying `predicate`.
pub fn count_by_category<F>(scholarships: &[Scholarship], predicate: F) -> usize
where
    F: Fn(&Scholarship) -> bool,
{
    scholarships
        .iter()
        .filter(|scholarship| predicate(*scholarship))
        .count()
}

/// Counts behind the category tiles on the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CategoryCounts {
    pub international: usize,
    pub need_based: usize,
    pub merit: usize,
    pub special: usize,
}

impl CategoryCounts {
    /// International is tallied from the flag, the rest from `category`.
    pub fn tally(scholarships: &[Scholarship]) -> Self {
        Self {
            international: count_by_category(scholarships, |s| s.is_international),
            need_based: count_by_category(scholarships, |s| s.category == Category::NeedBased),
            merit: count_by_category(scholarships, |s| s.category == Category::Merit),
            special: count_by_category(scholarships, |s| s.category == Category::Special),
        }
    }

    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::International => self.international,
            Category::NeedBased => self.need_based,
            Category::Merit => self.merit,
            Category::Special => self.special,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tallies_seed_catalog_tiles() {
        let catalog = seed::seed_catalog().expect("seed normalizes");
        let counts = CategoryCounts::tally(&catalog);

        assert_eq!(counts.international, 4);
        assert_eq!(counts.need_based, 5);
        assert_eq!(counts.merit, 4);
        assert_eq!(counts.special, 2);
        assert_eq!(counts.get(Category::Merit), 4);
    }

    #[test]
    fn count_by_category_matches_filter_length() {
        let catalog = seed::seed_catalog().expect("seed normalizes");
        let zakat = count_by_category(&catalog, |s| s.is_zakat_eligible);
        assert_eq!(
            zakat,
            catalog.iter().filter(|s| s.is_zakat_eligible).count()
        );
        assert_eq!(count_by_category(&[], |_| true), 0);
    }

    #[test]
    fn international_tile_follows_the_flag_not_the_category() {
        let mut catalog = seed::seed_catalog().expect("seed normalizes");
        let merit = catalog
            .iter_mut()
            .find(|s| s.category == Category::Merit)
            .expect("merit scholarship present");
        merit.is_international = true;

        let counts = CategoryCounts::tally(&catalog);
        assert_eq!(counts.international, 5);
        assert_eq!(counts.merit, 4);
    }
}
