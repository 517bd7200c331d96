use super::common::*;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::scoring::router::aggregate_handler;
use crate::scoring::ScoringService;
use axum::extract::{Path, State};

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request builds")
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn aggregate_route_returns_score_and_recommendation() {
    let (service, _, _) = seeded_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(empty_request(
            Method::GET,
            "/api/v1/scoring/candidates/cand-0042/aggregate",
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["overall_score"], json!(91.7));
    assert_eq!(body["recommendation"], json!("strong_hire"));
    assert_eq!(body["approximate"], json!(false));
}

#[tokio::test]
async fn override_then_aggregate_reflects_override() {
    let (service, _, _) = seeded_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/scoring/candidates/cand-0042/overrides/behavioural",
            json!({ "score": 70.0, "reason": "panel disagreed with automated score" }),
        ))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::OK);
    let applied = read_json_body(response).await;
    assert_eq!(
        applied["reason"],
        json!("panel disagreed with automated score")
    );

    let response = router
        .clone()
        .oneshot(empty_request(
            Method::GET,
            "/api/v1/scoring/candidates/cand-0042/aggregate",
        ))
        .await
        .expect("route responds");
    let body = read_json_body(response).await;
    assert_eq!(body["overall_score"], json!(84.2));
    assert_eq!(body["recommendation"], json!("hire"));

    let response = router
        .oneshot(empty_request(
            Method::DELETE,
            "/api/v1/scoring/candidates/cand-0042/overrides/behavioural",
        ))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn blank_override_reason_is_unprocessable() {
    let (service, _, _) = seeded_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/scoring/candidates/cand-0042/overrides/skills",
            json!({ "score": 40.0, "reason": " " }),
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("justification"));
}

#[tokio::test]
async fn unknown_category_is_unprocessable() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/scoring/candidates/cand-1/scores/charisma",
            json!({ "value": 80.0 }),
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn missing_category_score_is_not_found() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/scoring/candidates/cand-1/scores/skills",
            json!({ "value": 80.0 }),
        ))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(empty_request(
            Method::GET,
            "/api/v1/scoring/candidates/cand-1/aggregate",
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["missing_category"], json!("behavioural"));
}

#[tokio::test]
async fn config_routes_report_validity_and_version() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(empty_request(Method::GET, "/api/v1/scoring/config"))
        .await
        .expect("route responds");
    let body = read_json_body(response).await;
    assert_eq!(body["valid"], json!(true));
    assert_eq!(body["total_weight"], json!(100.0));
    assert_eq!(body["weights"]["skills"], json!(40.0));
    let version = body["version"].as_u64().expect("version");

    let response = router
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/scoring/config/weights/skills",
            json!({ "percentage": 50.0, "expected_version": version }),
        ))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["valid"], json!(false));
    assert_eq!(body["total_weight"], json!(110.0));

    let response = router
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/scoring/config/weights/skills",
            json!({ "percentage": 40.0, "expected_version": version }),
        ))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn out_of_range_weight_is_unprocessable() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/scoring/config/weights/assessment",
            json!({ "percentage": 140.0 }),
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn threshold_route_validates_ordering() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/scoring/config/thresholds",
            json!({ "strong_hire": 60.0, "hire": 70.0, "maybe": 50.0 }),
        ))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = router
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/scoring/config/thresholds",
            json!({ "strong_hire": 90.0, "hire": 75.0, "maybe": 55.0 }),
        ))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["thresholds"]["strong_hire"], json!(90.0));
}

#[tokio::test]
async fn exclude_route_drops_category() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(empty_request(
            Method::DELETE,
            "/api/v1/scoring/config/weights/experience",
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert!(body["weights"].get("experience").is_none());
    assert_eq!(body["total_weight"], json!(90.0));
}

#[tokio::test]
async fn scorecard_route_lists_scores_and_overrides() {
    let (service, _, _) = seeded_service();
    service
        .apply_override(
            &candidate_id(),
            crate::scoring::Category::Experience,
            60.0,
            "contract roles counted twice",
            None,
        )
        .expect("override applied");
    let router = router_with_service(service);

    let response = router
        .oneshot(empty_request(
            Method::GET,
            "/api/v1/scoring/candidates/cand-0042",
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["scores"].as_array().map(Vec::len), Some(4));
    assert_eq!(
        body["overrides"][0]["reason"],
        json!("contract roles counted twice")
    );
}

#[tokio::test]
async fn unknown_candidate_is_not_found() {
    let (service, _, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(empty_request(
            Method::GET,
            "/api/v1/scoring/candidates/nobody",
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn aggregate_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(ScoringService::new(
        Arc::new(UnavailableScores),
        Arc::new(MemoryConfig::new(scoring_config())),
        Arc::new(MemoryAudit::default()),
    ));

    let response = aggregate_handler::<UnavailableScores, MemoryConfig, MemoryAudit>(
        State(service),
        Path("cand-0042".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
