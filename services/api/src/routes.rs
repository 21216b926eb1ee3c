use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use propval::listings::{listings_router, ClientRateLimiter, DomainClient, DomainTransport};
use propval::report::report_router;
use propval::valuation::valuation_router;
use serde_json::json;
use std::sync::Arc;

/// Every HTTP surface of the service; `AppState` is supplied as an extension layer.
pub(crate) fn app_router<T>(
    client: Arc<DomainClient<T>>,
    limiter: Arc<ClientRateLimiter>,
) -> Router
where
    T: DomainTransport + 'static,
{
    report_router()
        .merge(valuation_router())
        .merge(listings_router(client, limiter))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
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
