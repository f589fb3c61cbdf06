use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::json;

use super::views::{RankRequest, RankResponse, SetWeightRequest, WeightSetView};
use super::{WeightingService, WeightingServiceError};
use crate::scoring::ScoringError;
use crate::settings::SettingsStore;

/// Router exposing weight inspection, adjustment and ranking.
pub fn scoring_router<S>(service: Arc<WeightingService<S>>) -> Router
where
    S: SettingsStore + 'static,
{
    Router::new()
        .route("/api/v1/scoring/categories", get(categories_handler::<S>))
        .route("/api/v1/scoring/reset", post(reset_handler::<S>))
        .route(
            "/api/v1/scoring/:category/weights",
            get(weights_handler::<S>),
        )
        .route(
            "/api/v1/scoring/:category/weights/:key",
            put(set_weight_handler::<S>),
        )
        .route("/api/v1/scoring/:category/rank", post(rank_handler::<S>))
        .with_state(service)
}

pub(crate) async fn categories_handler<S>(
    State(service): State<Arc<WeightingService<S>>>,
) -> Response
where
    S: SettingsStore + 'static,
{
    match service.categories() {
        Ok(categories) => axum::Json(json!({ "categories": categories })).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn weights_handler<S>(
    State(service): State<Arc<WeightingService<S>>>,
    Path(category): Path<String>,
) -> Response
where
    S: SettingsStore + 'static,
{
    match service.view(&category) {
        Ok(view) => axum::Json(view).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn set_weight_handler<S>(
    State(service): State<Arc<WeightingService<S>>>,
    Path((category, key)): Path<(String, String)>,
    axum::Json(request): axum::Json<SetWeightRequest>,
) -> Response
where
    S: SettingsStore + 'static,
{
    match service.set_weight(&category, &key, request.value) {
        Ok(weights) => {
            axum::Json(WeightSetView::from_weights(&weights, service.weight_target()))
                .into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rank_handler<S>(
    State(service): State<Arc<WeightingService<S>>>,
    Path(category): Path<String>,
    axum::Json(request): axum::Json<RankRequest>,
) -> Response
where
    S: SettingsStore + 'static,
{
    match service.rank(&category, request.candidates) {
        Ok(ranked) => axum::Json(RankResponse { category, ranked }).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reset_handler<S>(State(service): State<Arc<WeightingService<S>>>) -> Response
where
    S: SettingsStore + 'static,
{
    match service.reset() {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "status": "reset" }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn status_for(error: &WeightingServiceError) -> StatusCode {
    match error {
        WeightingServiceError::Scoring(
            ScoringError::UnknownCategory(_)
            | ScoringError::NotFound { .. }
            | ScoringError::UnknownCriterion { .. },
        ) => StatusCode::NOT_FOUND,
        WeightingServiceError::Scoring(ScoringError::DuplicateKey { .. }) => StatusCode::CONFLICT,
        WeightingServiceError::Scoring(_) => StatusCode::UNPROCESSABLE_ENTITY,
        WeightingServiceError::Settings(_) | WeightingServiceError::Poisoned => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(error: WeightingServiceError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::error!(error = %error, "weighting request failed");
    }
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
