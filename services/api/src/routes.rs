use crate::infra::{deserialize_instant, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use ops_scoring::analytics::{
    most_frequent_category, top_categories, AggregationReducer, CategoryImpact, KpiRecord,
    KpiSummary, TimeWindow,
};
use ops_scoring::error::AppError;
use ops_scoring::service::{scoring_router, WeightingService};
use ops_scoring::settings::SettingsStore;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

const DEFAULT_TOP_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
pub(crate) struct KpiRequest {
    #[serde(default)]
    pub(crate) records: Vec<KpiRecord>,
    #[serde(deserialize_with = "deserialize_instant")]
    pub(crate) window_start: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_instant")]
    pub(crate) window_end: DateTime<Utc>,
    #[serde(default)]
    pub(crate) top_field: Option<String>,
    #[serde(default)]
    pub(crate) top_limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(crate) struct KpiResponse {
    pub(crate) window: TimeWindow,
    pub(crate) record_count: usize,
    pub(crate) summary: KpiSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) most_frequent: Option<CategoryImpact>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) top_categories: Vec<CategoryImpact>,
}

pub(crate) fn with_scoring_routes<S>(service: Arc<WeightingService<S>>) -> axum::Router
where
    S: SettingsStore + 'static,
{
    scoring_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/analytics/kpis",
            axum::routing::post(kpi_summary_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn kpi_summary_endpoint(
    Json(payload): Json<KpiRequest>,
) -> Result<Json<KpiResponse>, AppError> {
    let KpiRequest {
        records,
        window_start,
        window_end,
        top_field,
        top_limit,
    } = payload;

    if top_limit == Some(0) {
        return Err(AppError::InvalidRequest(
            "top_limit must be at least 1".to_string(),
        ));
    }

    let window = TimeWindow::new(window_start, window_end);
    let summary = AggregationReducer::new().aggregate_window(&records, window);
    let top = match top_field {
        Some(field) => top_categories(
            &records,
            window,
            &field,
            top_limit.unwrap_or(DEFAULT_TOP_LIMIT),
        ),
        None => Vec::new(),
    };

    Ok(Json(KpiResponse {
        window,
        record_count: summary.record_count(),
        most_frequent: most_frequent_category(&records, window),
        top_categories: top,
        summary,
    }))
}
