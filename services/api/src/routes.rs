use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde_json::json;

use civiclens::civics::{
    civic_router, CivicService, CommentRepository, LeaderDirectory, ProfileStore, RatingRepository,
};

use crate::infra::AppState;

pub(crate) fn with_civic_routes<L, R, C, P>(
    service: Arc<CivicService<L, R, C>>,
    profiles: Arc<P>,
) -> axum::Router
where
    L: LeaderDirectory + 'static,
    R: RatingRepository + 'static,
    C: CommentRepository + 'static,
    P: ProfileStore + 'static,
{
    civic_router(service, profiles)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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
