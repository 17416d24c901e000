use crate::infra::{
    load_catalog_records, parse_category_filter, parse_date, InMemoryProfileStore,
    InMemoryScholarshipStore,
};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Args;
use sahulat::catalog::{Category, CategoryFilter, ListingFilter, Scholarship};
use sahulat::error::AppError;
use sahulat::matching::{DeadlineUrgency, EligibilityAssessment, Recommendations};
use sahulat::portal::{PortalError, ProfileStore, ScholarshipCard, ScholarshipPortal};
use sahulat::profile::{DegreeLevel, ProfileDraft, ProfileId, UserProfile};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogListArgs {
    /// Catalog export (.json or .csv). Defaults to the built-in seed.
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Evaluate deadlines as of this date (YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Case-insensitive text search over title, provider, and description
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// all, international, need-based, merit, or special
    #[arg(long, value_parser = parse_category_filter)]
    pub(crate) category: Option<CategoryFilter>,
    /// Only scholarships open to this province (exact name)
    #[arg(long)]
    pub(crate) province: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct CatalogMatchArgs {
    /// Student's province (exact name, e.g. "Khyber Pakhtunkhwa")
    #[arg(long)]
    pub(crate) province: String,
    /// GPA on the 4.0 scale
    #[arg(long)]
    pub(crate) gpa: f64,
    /// Monthly family income in PKR
    #[arg(long)]
    pub(crate) income: i64,
    /// Student is an orphan
    #[arg(long)]
    pub(crate) orphan: bool,
    /// Student is zakat-eligible
    #[arg(long)]
    pub(crate) zakat: bool,
    /// Evaluate deadlines as of this date (YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Catalog export (.json or .csv). Defaults to the built-in seed.
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

type CliPortal = ScholarshipPortal<InMemoryScholarshipStore, InMemoryProfileStore>;

fn build_portal(
    catalog: Option<PathBuf>,
) -> Result<(CliPortal, Arc<InMemoryProfileStore>), AppError> {
    let records = load_catalog_records(catalog.as_deref())?;
    let profiles = Arc::new(InMemoryProfileStore::default());
    let portal = ScholarshipPortal::new(
        Arc::new(InMemoryScholarshipStore::new(records)),
        profiles.clone(),
    );
    Ok((portal, profiles))
}

fn evaluation_instant(today: Option<NaiveDate>) -> NaiveDateTime {
    match today {
        Some(date) => date.and_time(NaiveTime::MIN),
        None => Local::now().naive_local(),
    }
}

pub(crate) fn run_catalog_list(args: CatalogListArgs) -> Result<(), AppError> {
    let CatalogListArgs {
        catalog,
        today,
        search,
        category,
        province,
    } = args;

    let (portal, _) = build_portal(catalog)?;
    let filter = ListingFilter {
        search,
        category: category.unwrap_or_default(),
        province,
    };
    let now = evaluation_instant(today);
    let cards = portal.browse(&filter, now)?;

    println!("Sahulat-e-Taleem scholarship catalog (as of {})", now.date());
    render_cards(&cards);
    if cards.is_empty() && filter.is_active() {
        println!("  Try clearing the search or filters.");
    }
    Ok(())
}

pub(crate) fn run_catalog_match(args: CatalogMatchArgs) -> Result<(), AppError> {
    let CatalogMatchArgs {
        province,
        gpa,
        income,
        orphan,
        zakat,
        today,
        catalog,
    } = args;

    let (portal, profiles) = build_portal(catalog)?;
    let placeholder = UserProfile::registered(
        ProfileId("cli".to_string()),
        "Command-line student",
        "",
    );
    let draft = ProfileDraft {
        full_name: placeholder.full_name.clone(),
        province,
        current_degree: DegreeLevel::Bachelors,
        gpa,
        family_income: income,
        is_orphan: orphan,
        is_zakat_eligible: zakat,
    };
    let profile = draft.validate(&placeholder).map_err(PortalError::from)?;
    profiles.upsert(profile.clone()).map_err(PortalError::from)?;

    let now = evaluation_instant(today);
    let recommendations = portal.recommendations(&profile.id, now)?;
    let assessments = portal.eligibility(&profile.id)?;
    let catalog = portal.active_catalog()?;

    println!(
        "Eligibility for a {} student (GPA {:.2}, family income PKR {}) as of {}",
        profile.province,
        profile.gpa,
        profile.family_income,
        now.date()
    );
    render_recommendations(&recommendations);
    render_unmet(&assessments, &catalog);
    Ok(())
}

fn urgency_tag(urgency: DeadlineUrgency, days_remaining: i64) -> String {
    match urgency {
        DeadlineUrgency::Expired => "EXPIRED".to_string(),
        DeadlineUrgency::Urgent if days_remaining == 0 => "closes today".to_string(),
        DeadlineUrgency::Urgent | DeadlineUrgency::Warning => {
            format!("{} day(s) left", days_remaining)
        }
        DeadlineUrgency::Normal => "open".to_string(),
    }
}

pub(crate) fn render_cards(cards: &[ScholarshipCard]) {
    if cards.is_empty() {
        println!("  No scholarships match.");
        return;
    }

    for card in cards {
        let scholarship = &card.scholarship;
        let mut tags = vec![scholarship.category.label()];
        if scholarship.is_international && scholarship.category != Category::International {
            tags.push("International");
        }
        if scholarship.is_zakat_eligible {
            tags.push("Zakat");
        }
        if scholarship.is_orphan_quota {
            tags.push("Orphan quota");
        }
        println!(
            "- [{}] {} | {}",
            urgency_tag(card.deadline.urgency, card.deadline.days_remaining),
            scholarship.title,
            scholarship.provider
        );
        println!(
            "    deadline {} | {} | min GPA {:.1} | income <= PKR {} | {}",
            scholarship.deadline,
            scholarship.amount,
            scholarship.min_gpa,
            scholarship.max_income,
            tags.join(", ")
        );
        let provinces = if scholarship.open_to_all_provinces() {
            "all provinces".to_string()
        } else {
            scholarship.allowed_provinces.join(", ")
        };
        println!("    open to {} | apply: {}", provinces, card.apply.url);
    }
}

pub(crate) fn render_recommendations(recommendations: &Recommendations) {
    println!("\nMatched scholarships ({}):", recommendations.matches.len());
    if recommendations.matches.is_empty() {
        println!("  None yet.");
    }
    for scholarship in &recommendations.matches {
        println!(
            "  - {} ({}) deadline {}",
            scholarship.title, scholarship.provider, scholarship.deadline
        );
    }

    if !recommendations.approaching_deadlines.is_empty() {
        println!("\nApproaching deadlines:");
        for entry in &recommendations.approaching_deadlines {
            println!(
                "  - {}: {} day(s) left",
                entry.scholarship.title, entry.days_remaining
            );
        }
    }

    if recommendations.suggest_profile_update {
        println!("\nOnly a few matches. Double-check the profile details for more results.");
    }
}

fn render_unmet(assessments: &[EligibilityAssessment], catalog: &[Scholarship]) {
    let rejected: Vec<&EligibilityAssessment> =
        assessments.iter().filter(|assessment| !assessment.eligible).collect();
    if rejected.is_empty() {
        return;
    }

    println!("\nNot eligible:");
    for assessment in rejected {
        let title = catalog
            .iter()
            .find(|scholarship| scholarship.id == assessment.scholarship_id)
            .map(|scholarship| scholarship.title.as_str())
            .unwrap_or(assessment.scholarship_id.0.as_str());
        let reasons: Vec<&str> = assessment
            .unmet
            .iter()
            .map(|unmet| unmet.note.as_str())
            .collect();
        println!("  - {}: {}", title, reasons.join("; "));
    }
}
