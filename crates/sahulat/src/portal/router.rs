use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use serde_json::json;

use super::repository::{ProfileStore, ScholarshipStore, StoreError};
use super::service::{PortalError, Registration, ScholarshipPortal};
use crate::catalog::{
    CategoryFilter, ListingFilter, ScholarshipDraft, ScholarshipEdit, ScholarshipId,
};
use crate::profile::{ProfileDraft, ProfileId};

type SharedPortal<S, P> = Arc<ScholarshipPortal<S, P>>;

/// JSON endpoints for the listing, dashboard, profile, and admin pages.
pub fn portal_router<S, P>(portal: SharedPortal<S, P>) -> Router
where
    S: ScholarshipStore + 'static,
    P: ProfileStore + 'static,
{
    Router::new()
        .route("/api/v1/scholarships", get(listing_handler::<S, P>))
        .route(
            "/api/v1/scholarships/categories",
            get(categories_handler::<S, P>),
        )
        .route(
            "/api/v1/scholarships/:scholarship_id/link-reports",
            post(link_report_handler::<S, P>),
        )
        .route("/api/v1/profiles", post(register_handler::<S, P>))
        .route(
            "/api/v1/profiles/:profile_id",
            get(profile_handler::<S, P>)
                .put(save_profile_handler::<S, P>)
                .delete(delete_profile_handler::<S, P>),
        )
        .route(
            "/api/v1/profiles/:profile_id/recommendations",
            get(recommendations_handler::<S, P>),
        )
        .route(
            "/api/v1/profiles/:profile_id/eligibility",
            get(eligibility_handler::<S, P>),
        )
        .route(
            "/api/v1/admin/scholarships",
            get(admin_list_handler::<S, P>).post(admin_create_handler::<S, P>),
        )
        .route(
            "/api/v1/admin/scholarships/:scholarship_id",
            put(admin_update_handler::<S, P>)
                .delete(admin_delete_handler::<S, P>),
        )
        .with_state(portal)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub province: Option<String>,
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AsOfParams {
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AdminSearchParams {
    pub search: Option<String>,
}

/// Midnight of `as_of` when given, otherwise the local wall clock.
fn evaluation_instant(as_of: Option<NaiveDate>) -> NaiveDateTime {
    match as_of {
        Some(date) => date.and_time(NaiveTime::MIN),
        None => Local::now().naive_local(),
    }
}

pub(crate) async fn listing_handler<S, P>(
    State(portal): State<SharedPortal<S, P>>,
    Query(params): Query<ListingParams>,
) -> Response
where
    S: ScholarshipStore + 'static,
    P: ProfileStore + 'static,
{
    let category = match params.category.as_deref() {
        None => CategoryFilter::All,
        Some(raw) => match CategoryFilter::parse(raw) {
            Some(filter) => filter,
            None => {
                let payload = json!({
                    "error": format!("unknown category '{raw}'"),
                });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
            }
        },
    };
    let filter = ListingFilter {
        search: params.search,
        category,
        province: params.province,
    };

    match portal.browse(&filter, evaluation_instant(params.as_of)) {
        Ok(cards) => (StatusCode::OK, axum::Json(cards)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn categories_handler<S, P>(State(portal): State<SharedPortal<S, P>>) -> Response
where
    S: ScholarshipStore + 'static,
    P: ProfileStore + 'static,
{
    match portal.category_counts() {
        Ok(counts) => (StatusCode::OK, axum::Json(counts)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn link_report_handler<S, P>(
    State(portal): State<SharedPortal<S, P>>,
    Path(scholarship_id): Path<String>,
) -> Response
where
    S: ScholarshipStore + 'static,
    P: ProfileStore + 'static,
{
    let id = ScholarshipId(scholarship_id);
    match portal.report_broken_link(&id, Local::now().naive_local()) {
        Ok(report) => (StatusCode::ACCEPTED, axum::Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn register_handler<S, P>(
    State(portal): State<SharedPortal<S, P>>,
    axum::Json(registration): axum::Json<Registration>,
) -> Response
where
    S: ScholarshipStore + 'static,
    P: ProfileStore + 'static,
{
    match portal.register_profile(registration) {
        Ok(profile) => (StatusCode::CREATED, axum::Json(profile)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn profile_handler<S, P>(
    State(portal): State<SharedPortal<S, P>>,
    Path(profile_id): Path<String>,
) -> Response
where
    S: ScholarshipStore + 'static,
    P: ProfileStore + 'static,
{
    match portal.profile(&ProfileId(profile_id)) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn save_profile_handler<S, P>(
    State(portal): State<SharedPortal<S, P>>,
    Path(profile_id): Path<String>,
    axum::Json(draft): axum::Json<ProfileDraft>,
) -> Response
where
    S: ScholarshipStore + 'static,
    P: ProfileStore + 'static,
{
    match portal.save_profile(&ProfileId(profile_id), draft) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_profile_handler<S, P>(
    State(portal): State<SharedPortal<S, P>>,
    Path(profile_id): Path<String>,
) -> Response
where
    S: ScholarshipStore + 'static,
    P: ProfileStore + 'static,
{
    match portal.delete_profile(&ProfileId(profile_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn recommendations_handler<S, P>(
    State(portal): State<SharedPortal<S, P>>,
    Path(profile_id): Path<String>,
    Query(params): Query<AsOfParams>,
) -> Response
where
    S: ScholarshipStore + 'static,
    P: ProfileStore + 'static,
{
    let now = evaluation_instant(params.as_of);
    match portal.recommendations(&ProfileId(profile_id), now) {
        Ok(recommendations) => (StatusCode::OK, axum::Json(recommendations)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn eligibility_handler<S, P>(
    State(portal): State<SharedPortal<S, P>>,
    Path(profile_id): Path<String>,
) -> Response
where
    S: ScholarshipStore + 'static,
    P: ProfileStore + 'static,
{
    match portal.eligibility(&ProfileId(profile_id)) {
        Ok(assessments) => (StatusCode::OK, axum::Json(assessments)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn admin_list_handler<S, P>(
    State(portal): State<SharedPortal<S, P>>,
    Query(params): Query<AdminSearchParams>,
) -> Response
where
    S: ScholarshipStore + 'static,
    P: ProfileStore + 'static,
{
    match portal.admin_catalog(params.search.as_deref()) {
        Ok(catalog) => (StatusCode::OK, axum::Json(catalog)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn admin_create_handler<S, P>(
    State(portal): State<SharedPortal<S, P>>,
    axum::Json(draft): axum::Json<ScholarshipDraft>,
) -> Response
where
    S: ScholarshipStore + 'static,
    P: ProfileStore + 'static,
{
    match portal.create_scholarship(draft) {
        Ok(scholarship) => (StatusCode::CREATED, axum::Json(scholarship)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn admin_update_handler<S, P>(
    State(portal): State<SharedPortal<S, P>>,
    Path(scholarship_id): Path<String>,
    axum::Json(edit): axum::Json<ScholarshipEdit>,
) -> Response
where
    S: ScholarshipStore + 'static,
    P: ProfileStore + 'static,
{
    match portal.update_scholarship(&ScholarshipId(scholarship_id), edit) {
        Ok(scholarship) => (StatusCode::OK, axum::Json(scholarship)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn admin_delete_handler<S, P>(
    State(portal): State<SharedPortal<S, P>>,
    Path(scholarship_id): Path<String>,
) -> Response
where
    S: ScholarshipStore + 'static,
    P: ProfileStore + 'static,
{
    match portal.delete_scholarship(&ScholarshipId(scholarship_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: PortalError) -> Response {
    let status = match &err {
        PortalError::ProfileNotFound(_)
        | PortalError::ScholarshipNotFound(_)
        | PortalError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        PortalError::Profile(_) | PortalError::Draft(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PortalError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        PortalError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        PortalError::Normalize(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
