use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CandidateId, Category, ScoringError, ValidationError};
use super::evaluation::ThresholdConfiguration;
use super::repository::{AuditPublisher, RepositoryError, ScoreRepository, WeightConfigRepository};
use super::service::{ScoringService, ScoringServiceError};

type SharedService<S, W, A> = Arc<ScoringService<S, W, A>>;

/// Router builder exposing the weight editor, score intake, override, and aggregate endpoints.
pub fn scoring_router<S, W, A>(service: SharedService<S, W, A>) -> Router
where
    S: ScoreRepository + 'static,
    W: WeightConfigRepository + 'static,
    A: AuditPublisher + 'static,
{
    Router::new()
        .route("/api/v1/scoring/config", get(config_handler::<S, W, A>))
        .route(
            "/api/v1/scoring/config/weights/:category",
            put(set_weight_handler::<S, W, A>).delete(exclude_category_handler::<S, W, A>),
        )
        .route(
            "/api/v1/scoring/config/thresholds",
            put(set_thresholds_handler::<S, W, A>),
        )
        .route(
            "/api/v1/scoring/candidates/:candidate_id",
            get(scorecard_handler::<S, W, A>),
        )
        .route(
            "/api/v1/scoring/candidates/:candidate_id/scores/:category",
            put(record_score_handler::<S, W, A>),
        )
        .route(
            "/api/v1/scoring/candidates/:candidate_id/overrides/:category",
            put(apply_override_handler::<S, W, A>).delete(remove_override_handler::<S, W, A>),
        )
        .route(
            "/api/v1/scoring/candidates/:candidate_id/aggregate",
            get(aggregate_handler::<S, W, A>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct WeightUpdate {
    pub(crate) percentage: f64,
    #[serde(default)]
    pub(crate) expected_version: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ThresholdUpdate {
    pub(crate) strong_hire: f64,
    pub(crate) hire: f64,
    pub(crate) maybe: f64,
    #[serde(default)]
    pub(crate) expected_version: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreUpdate {
    pub(crate) value: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverrideRequest {
    pub(crate) score: f64,
    pub(crate) reason: String,
    #[serde(default)]
    pub(crate) reviewer: Option<String>,
}

pub(crate) async fn config_handler<S, W, A>(
    State(service): State<SharedService<S, W, A>>,
) -> Response
where
    S: ScoreRepository + 'static,
    W: WeightConfigRepository + 'static,
    A: AuditPublisher + 'static,
{
    match service.configuration() {
        Ok(config) => (StatusCode::OK, axum::Json(config.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn set_weight_handler<S, W, A>(
    State(service): State<SharedService<S, W, A>>,
    Path(category): Path<String>,
    axum::Json(update): axum::Json<WeightUpdate>,
) -> Response
where
    S: ScoreRepository + 'static,
    W: WeightConfigRepository + 'static,
    A: AuditPublisher + 'static,
{
    let category = match category.parse::<Category>() {
        Ok(category) => category,
        Err(error) => return validation_response(&error),
    };

    match service.set_weight(category, update.percentage, update.expected_version) {
        Ok(config) => (StatusCode::OK, axum::Json(config.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn exclude_category_handler<S, W, A>(
    State(service): State<SharedService<S, W, A>>,
    Path(category): Path<String>,
) -> Response
where
    S: ScoreRepository + 'static,
    W: WeightConfigRepository + 'static,
    A: AuditPublisher + 'static,
{
    let category = match category.parse::<Category>() {
        Ok(category) => category,
        Err(error) => return validation_response(&error),
    };

    match service.exclude_category(category, None) {
        Ok(config) => (StatusCode::OK, axum::Json(config.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn set_thresholds_handler<S, W, A>(
    State(service): State<SharedService<S, W, A>>,
    axum::Json(update): axum::Json<ThresholdUpdate>,
) -> Response
where
    S: ScoreRepository + 'static,
    W: WeightConfigRepository + 'static,
    A: AuditPublisher + 'static,
{
    let thresholds =
        match ThresholdConfiguration::new(update.strong_hire, update.hire, update.maybe) {
            Ok(thresholds) => thresholds,
            Err(error) => return validation_response(&error),
        };

    match service.set_thresholds(thresholds, update.expected_version) {
        Ok(config) => (StatusCode::OK, axum::Json(config.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn scorecard_handler<S, W, A>(
    State(service): State<SharedService<S, W, A>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    S: ScoreRepository + 'static,
    W: WeightConfigRepository + 'static,
    A: AuditPublisher + 'static,
{
    match service.scorecard(&CandidateId(candidate_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn record_score_handler<S, W, A>(
    State(service): State<SharedService<S, W, A>>,
    Path((candidate_id, category)): Path<(String, String)>,
    axum::Json(update): axum::Json<ScoreUpdate>,
) -> Response
where
    S: ScoreRepository + 'static,
    W: WeightConfigRepository + 'static,
    A: AuditPublisher + 'static,
{
    let category = match category.parse::<Category>() {
        Ok(category) => category,
        Err(error) => return validation_response(&error),
    };

    match service.record_score(&CandidateId(candidate_id), category, update.value) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn apply_override_handler<S, W, A>(
    State(service): State<SharedService<S, W, A>>,
    Path((candidate_id, category)): Path<(String, String)>,
    axum::Json(request): axum::Json<OverrideRequest>,
) -> Response
where
    S: ScoreRepository + 'static,
    W: WeightConfigRepository + 'static,
    A: AuditPublisher + 'static,
{
    let category = match category.parse::<Category>() {
        Ok(category) => category,
        Err(error) => return validation_response(&error),
    };

    match service.apply_override(
        &CandidateId(candidate_id),
        category,
        request.score,
        &request.reason,
        request.reviewer.as_deref(),
    ) {
        Ok(applied) => (StatusCode::OK, axum::Json(applied)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_override_handler<S, W, A>(
    State(service): State<SharedService<S, W, A>>,
    Path((candidate_id, category)): Path<(String, String)>,
) -> Response
where
    S: ScoreRepository + 'static,
    W: WeightConfigRepository + 'static,
    A: AuditPublisher + 'static,
{
    let category = match category.parse::<Category>() {
        Ok(category) => category,
        Err(error) => return validation_response(&error),
    };

    match service.remove_override(&CandidateId(candidate_id), category) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn aggregate_handler<S, W, A>(
    State(service): State<SharedService<S, W, A>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    S: ScoreRepository + 'static,
    W: WeightConfigRepository + 'static,
    A: AuditPublisher + 'static,
{
    match service.compute(&CandidateId(candidate_id)) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

fn validation_response(error: &ValidationError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}

fn error_response(error: ScoringServiceError) -> Response {
    match error {
        ScoringServiceError::Scoring(ScoringError::Validation(error)) => {
            validation_response(&error)
        }
        ScoringServiceError::Scoring(ScoringError::NotFound {
            candidate_id,
            category,
        }) => {
            let payload = json!({
                "error": format!("candidate {candidate_id} has no {category} score"),
                "candidate_id": candidate_id.0,
                "missing_category": category,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        ScoringServiceError::UnknownCandidate(candidate_id) => {
            let payload = json!({
                "error": format!("candidate {candidate_id} has no recorded scores"),
                "candidate_id": candidate_id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        ScoringServiceError::Repository(RepositoryError::Conflict { expected, current }) => {
            let payload = json!({
                "error": "scoring configuration changed since it was read",
                "expected_version": expected,
                "current_version": current,
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
