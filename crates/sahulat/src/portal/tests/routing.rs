use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::portal::router::{admin_delete_handler, categories_handler};
use crate::portal::ScholarshipPortal;

#[tokio::test]
async fn listing_route_filters_and_classifies_as_of_date() {
    let (portal, _, _) = build_portal();
    let router = router_with_portal(portal);

    let response = router
        .oneshot(
            Request::get("/api/v1/scholarships?province=Sindh&search=sindh&as_of=2025-12-25")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let cards = body.as_array().expect("array of cards");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["scholarship"]["id"], "9");
    assert_eq!(cards[0]["deadline"]["days_remaining"], 5);
    assert_eq!(cards[0]["deadline"]["urgency"], "urgent");
    assert_eq!(cards[0]["apply"]["kind"], "official_link");
}

#[tokio::test]
async fn listing_route_rejects_unknown_category() {
    let (portal, _, _) = build_portal();
    let response = router_with_portal(portal)
        .oneshot(
            Request::get("/api/v1/scholarships?category=sports")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn categories_handler_maps_unavailable_store_to_503() {
    let portal = Arc::new(ScholarshipPortal::new(
        Arc::new(UnavailableStore),
        Arc::new(MemoryProfileStore::default()),
    ));

    let response = categories_handler::<UnavailableStore, MemoryProfileStore>(State(portal)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("database offline"));
}

#[tokio::test]
async fn recommendations_route_uses_as_of_date() {
    let (portal, _, _) = build_portal();
    let response = router_with_portal(portal)
        .oneshot(
            Request::get("/api/v1/profiles/u-sindh/recommendations?as_of=2026-01-01")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["matches"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["approaching_deadlines"][0]["days_remaining"], 14);
    assert_eq!(body["suggest_profile_update"], false);
}

#[tokio::test]
async fn unknown_profile_is_404() {
    let (portal, _, _) = build_portal();
    let response = router_with_portal(portal)
        .oneshot(
            Request::get("/api/v1/profiles/ghost/eligibility")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn register_then_conflict() {
    let (portal, _, _) = build_portal();
    let router = router_with_portal(portal);
    let payload = json!({
        "id": "u-quetta",
        "full_name": "Zainab Baloch",
        "email": "zainab@example.pk",
    });

    let request = || {
        Request::post("/api/v1/profiles")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request")
    };

    let created = router.clone().oneshot(request()).await.expect("response");
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = read_json_body(created).await;
    assert_eq!(body["current_degree"], "Bachelor's");

    let duplicate = router.oneshot(request()).await.expect("response");
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_profile_draft_is_422() {
    let (portal, _, _) = build_portal();
    let payload = json!({
        "full_name": "Sana Memon",
        "province": "Sindh",
        "current_degree": "Master's",
        "gpa": 4.7,
        "family_income": 55000,
    });

    let response = router_with_portal(portal)
        .oneshot(
            Request::put("/api/v1/profiles/u-sindh")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().expect("message").contains("4.7"));
}

#[tokio::test]
async fn admin_create_uses_draft_defaults() {
    let (portal, _, _) = build_portal();
    let payload = json!({
        "title": "Azad Kashmir Merit Award",
        "official_link": "https://ajk.gov.pk/merit",
        "deadline": "2026-09-30",
        "category": "merit",
        "allowed_provinces": ["Azad Kashmir"],
    });

    let response = router_with_portal(portal)
        .oneshot(
            Request::post("/api/v1/admin/scholarships")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["provider"], "Unknown");
    assert_eq!(body["amount"], "Varies");
    assert_eq!(body["min_gpa"], 2.0);
    assert_eq!(body["max_income"], 50000);
    assert_eq!(body["status"], "active");
}

#[tokio::test]
async fn admin_delete_handler_reports_missing_rows() {
    let (portal, _, _) = build_portal();
    let portal = Arc::new(portal);

    let response = admin_delete_handler::<MemoryScholarshipStore, MemoryProfileStore>(
        State(portal.clone()),
        Path("3".to_string()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = admin_delete_handler::<MemoryScholarshipStore, MemoryProfileStore>(
        State(portal),
        Path("3".to_string()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn link_report_route_accepts_reports() {
    let (portal, _, _) = build_portal();
    let response = router_with_portal(portal)
        .oneshot(
            Request::post("/api/v1/scholarships/11/link-reports")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = read_json_body(response).await;
    assert_eq!(body["url"], "https://www.campuschina.org");
}
