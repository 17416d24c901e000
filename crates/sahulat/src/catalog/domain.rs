use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provinces and territories a scholarship can be restricted to, in display order.
pub const PROVINCES: [&str; 7] = [
    "Punjab",
    "Sindh",
    "Khyber Pakhtunkhwa",
    "Balochistan",
    "Gilgit-Baltistan",
    "Azad Kashmir",
    "Islamabad Capital Territory",
];

/// Exact, case-sensitive membership in [`PROVINCES`].
pub fn is_recognized_province(name: &str) -> bool {
    PROVINCES.contains(&name)
}

/// Identifier assigned by the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScholarshipId(pub String);

impl fmt::Display for ScholarshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Listing category. Independent of the `is_international` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    International,
    NeedBased,
    Merit,
    Special,
}

impl Category {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::International,
            Self::NeedBased,
            Self::Merit,
            Self::Special,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::International => "international",
            Self::NeedBased => "need-based",
            Self::Merit => "merit",
            Self::Special => "special",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::International => "International",
            Self::NeedBased => "Need-Based",
            Self::Merit => "Merit-Based",
            Self::Special => "Special Quota",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ordered()
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value))
    }
}

/// Administrative lifecycle. Only `Active` records reach end users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScholarshipStatus {
    Active,
    Inactive,
    Expired,
}

impl ScholarshipStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Expired => "expired",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

/// Canonical scholarship shared by listing, matching, and admin views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scholarship {
    pub id: ScholarshipId,
    pub title: String,
    pub provider: String,
    pub description: String,
    pub deadline: NaiveDate,
    pub amount: String,
    pub official_link: String,
    pub provider_homepage: String,
    pub min_gpa: f64,
    pub max_income: i64,
    pub allowed_provinces: Vec<String>,
    pub is_international: bool,
    pub is_zakat_eligible: bool,
    pub is_orphan_quota: bool,
    pub category: Category,
    pub status: ScholarshipStatus,
}

impl Scholarship {
    pub fn is_active(&self) -> bool {
        self.status == ScholarshipStatus::Active
    }

    pub fn allows_province(&self, province: &str) -> bool {
        self.allowed_provinces.iter().any(|allowed| allowed == province)
    }

    pub fn open_to_all_provinces(&self) -> bool {
        PROVINCES
            .iter()
            .all(|province| self.allows_province(province))
    }

    /// Where the apply button sends the visitor.
    pub fn application_target(&self) -> ApplicationTarget {
        if self.official_link.trim().is_empty() {
            ApplicationTarget {
                url: self.provider_homepage.clone(),
                kind: ApplicationTargetKind::ProviderHomepage,
            }
        } else {
            ApplicationTarget {
                url: self.official_link.clone(),
                kind: ApplicationTargetKind::OfficialLink,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationTarget {
    pub url: String,
    pub kind: ApplicationTargetKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationTargetKind {
    OfficialLink,
    ProviderHomepage,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scholarship() -> Scholarship {
        Scholarship {
            id: ScholarshipId("peef-2".to_string()),
            title: "PEEF Master Level Scholarship".to_string(),
            provider: "Punjab Educational Endowment Fund (PEEF)".to_string(),
            description: "Master's support".to_string(),
            deadline: NaiveDate::from_ymd_opt(2026, 2, 28).expect("valid date"),
            amount: "Full tuition".to_string(),
            official_link: "https://peef.org.pk/apply".to_string(),
            provider_homepage: "https://peef.org.pk".to_string(),
            min_gpa: 2.4,
            max_income: 60000,
            allowed_provinces: vec!["Punjab".to_string()],
            is_international: false,
            is_zakat_eligible: false,
            is_orphan_quota: false,
            category: Category::Merit,
            status: ScholarshipStatus::Active,
        }
    }

    #[test]
    fn application_target_falls_back_to_homepage_for_blank_links() {
        let mut scholarship = scholarship();
        assert_eq!(
            scholarship.application_target().kind,
            ApplicationTargetKind::OfficialLink
        );

        scholarship.official_link = "   ".to_string();
        let target = scholarship.application_target();
        assert_eq!(target.kind, ApplicationTargetKind::ProviderHomepage);
        assert_eq!(target.url, "https://peef.org.pk");
    }

    #[test]
    fn province_membership_is_exact() {
        let mut scholarship = scholarship();
        assert!(scholarship.allows_province("Punjab"));
        assert!(!scholarship.allows_province("punjab"));
        assert!(!scholarship.open_to_all_provinces());

        scholarship.allowed_provinces = PROVINCES.iter().map(|p| p.to_string()).collect();
        assert!(scholarship.open_to_all_provinces());
    }

    #[test]
    fn category_parsing_accepts_store_spelling() {
        assert_eq!(Category::parse("need-based"), Some(Category::NeedBased));
        assert_eq!(Category::parse(" Merit "), Some(Category::Merit));
        assert_eq!(Category::parse("need_based"), None);
        assert_eq!(ScholarshipStatus::parse("EXPIRED"), Some(ScholarshipStatus::Expired));
        assert_eq!(ScholarshipStatus::parse("archived"), None);
    }
}
