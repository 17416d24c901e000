use super::domain::{Category, Scholarship};
use super::record::ScholarshipRecord;
use serde::{Deserialize, Deserializer, Serialize};

/// Category dropdown on the listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        Category::parse(value).map(Self::Only)
    }

    /// `International` follows the flag; every other category follows `category`.
    pub fn admits(self, scholarship: &Scholarship) -> bool {
        match self {
            Self::All => true,
            Self::Only(Category::International) => scholarship.is_international,
            Self::Only(category) => scholarship.category == category,
        }
    }
}

impl<'de> Deserialize<'de> for CategoryFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown category filter '{raw}'")))
    }
}

/// Search box plus dropdowns from the public listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListingFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(default)]
    pub province: Option<String>,
}

impl ListingFilter {
    pub fn matches(&self, scholarship: &Scholarship) -> bool {
        if let Some(query) = self.normalized_query() {
            let hit = contains_folded(&scholarship.title, &query)
                || contains_folded(&scholarship.provider, &query)
                || contains_folded(&scholarship.description, &query);
            if !hit {
                return false;
            }
        }

        if !self.category.admits(scholarship) {
            return false;
        }

        match self.province.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(province) if province.eq_ignore_ascii_case("all") => true,
            Some(province) => scholarship.allows_province(province),
        }
    }

    /// Filter preserving input order.
    pub fn apply<'a>(&self, scholarships: &'a [Scholarship]) -> Vec<&'a Scholarship> {
        scholarships
            .iter()
            .filter(|scholarship| self.matches(scholarship))
            .collect()
    }

    pub fn is_active(&self) -> bool {
        self.normalized_query().is_some()
            || self.category != CategoryFilter::All
            || self
                .province
                .as_deref()
                .map(|p| !p.trim().is_empty() && !p.trim().eq_ignore_ascii_case("all"))
                .unwrap_or(false)
    }

    fn normalized_query(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .map(str::to_lowercase)
    }
}

fn contains_folded(haystack: &str, lowered_query: &str) -> bool {
    haystack.to_lowercase().contains(lowered_query)
}

/// Admin table search: title or provider, any status.
pub fn admin_search<'a>(
    records: &'a [ScholarshipRecord],
    query: Option<&str>,
) -> Vec<&'a ScholarshipRecord> {
    let query = query
        .map(str::trim)
        .filter(|query| !query.is_empty())
        .map(str::to_lowercase);

    records
        .iter()
        .filter(|record| match &query {
            None => true,
            Some(query) => {
                contains_folded(&record.title, query) || contains_folded(&record.provider, query)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed::{seed_catalog, seed_records};

    fn titles(found: &[&Scholarship]) -> Vec<String> {
        found.iter().map(|s| s.title.clone()).collect()
    }

    #[test]
    fn search_is_case_insensitive_across_text_fields() {
        let catalog = seed_catalog().expect("seed normalizes");
        let filter = ListingFilter {
            search: Some("  peef ".to_string()),
            ..ListingFilter::default()
        };
        let found = filter.apply(&catalog);
        assert_eq!(found.len(), 2);
        assert!(titles(&found).iter().all(|title| title.contains("PEEF")));

        let by_description = ListingFilter {
            search: Some("HUNGARIAN".to_string()),
            ..ListingFilter::default()
        };
        assert_eq!(by_description.apply(&catalog).len(), 1);
    }

    #[test]
    fn international_filter_uses_the_flag() {
        let mut catalog = seed_catalog().expect("seed normalizes");
        let nestle = catalog
            .iter_mut()
            .find(|s| s.title.starts_with("Nestl"))
            .expect("nestle present");
        nestle.is_international = true;

        let filter = ListingFilter {
            category: CategoryFilter::Only(Category::International),
            ..ListingFilter::default()
        };
        let found = filter.apply(&catalog);
        assert_eq!(found.len(), 5);
        assert!(found.iter().any(|s| s.category == Category::Merit));

        let merit = ListingFilter {
            category: CategoryFilter::Only(Category::Merit),
            ..ListingFilter::default()
        };
        assert_eq!(merit.apply(&catalog).len(), 4);
    }

    #[test]
    fn province_filter_is_exact_membership_and_order_is_kept() {
        let catalog = seed_catalog().expect("seed normalizes");
        let filter = ListingFilter {
            province: Some("Balochistan".to_string()),
            ..ListingFilter::default()
        };
        let found = filter.apply(&catalog);
        assert!(found.iter().all(|s| s.allows_province("Balochistan")));
        let positions: Vec<usize> = found
            .iter()
            .map(|hit| {
                catalog
                    .iter()
                    .position(|s| s.id == hit.id)
                    .expect("hit from catalog")
            })
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

        let sloppy = ListingFilter {
            province: Some("balochistan".to_string()),
            ..ListingFilter::default()
        };
        assert!(sloppy.apply(&catalog).is_empty());
    }

    #[test]
    fn category_filter_parses_dropdown_values() {
        assert_eq!(CategoryFilter::parse("all"), Some(CategoryFilter::All));
        assert_eq!(CategoryFilter::parse(""), Some(CategoryFilter::All));
        assert_eq!(
            CategoryFilter::parse("need-based"),
            Some(CategoryFilter::Only(Category::NeedBased))
        );
        assert_eq!(CategoryFilter::parse("sports"), None);
        assert!(!ListingFilter::default().is_active());
    }

    #[test]
    fn admin_search_matches_title_or_provider_only() {
        let records = seed_records().expect("seed parses");
        assert_eq!(admin_search(&records, None).len(), records.len());
        assert_eq!(admin_search(&records, Some("fauji")).len(), 1);
        assert!(admin_search(&records, Some("army personnel")).is_empty());
    }
}
