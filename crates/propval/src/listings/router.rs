use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use super::client::{DomainClient, SuburbStatsQuery};
use super::error::ListingsError;
use super::limiter::{enforce_client_limit, ClientRateLimiter};
use super::transport::DomainTransport;

const DEFAULT_SUGGEST_PAGE_SIZE: u32 = 20;

/// Proxy routes under `/api/v1/domain`, all behind the per-client limiter.
pub fn listings_router<T>(client: Arc<DomainClient<T>>, limiter: Arc<ClientRateLimiter>) -> Router
where
    T: DomainTransport + 'static,
{
    let routes = Router::new()
        .route("/suggest", get(suggest_handler::<T>))
        .route("/properties/:id", get(property_handler::<T>))
        .route("/listings/commercial", post(commercial_handler::<T>))
        .route("/listings/residential", post(residential_handler::<T>))
        .route("/demographics/:state/:suburb", get(demographics_handler::<T>))
        .route(
            "/demographics/:state/:suburb/:postcode",
            get(demographics_handler::<T>),
        )
        .route("/stats/:state/:suburb", get(stats_handler::<T>))
        .route("/stats/:state/:suburb/:postcode", get(stats_handler::<T>))
        .route("/sales/:city", get(sales_handler::<T>))
        .route("/status", get(status_handler::<T>))
        .route_layer(middleware::from_fn_with_state(limiter, enforce_client_limit))
        .with_state(client);

    Router::new().nest("/api/v1/domain", routes)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SuggestParams {
    terms: Option<String>,
    page_size: Option<u32>,
    channel: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegionParams {
    state: String,
    suburb: String,
    #[serde(default)]
    postcode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DemographicsParams {
    types: Option<String>,
}

fn respond(result: Result<Value, ListingsError>) -> Response {
    match result {
        Ok(data) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": data })),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "Domain API proxy request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

pub(crate) async fn suggest_handler<T>(
    State(client): State<Arc<DomainClient<T>>>,
    Query(params): Query<SuggestParams>,
) -> Response
where
    T: DomainTransport + 'static,
{
    let Some(terms) = params.terms.filter(|terms| !terms.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "terms query parameter is required" })),
        )
            .into_response();
    };
    let page_size = params.page_size.unwrap_or(DEFAULT_SUGGEST_PAGE_SIZE);
    let channel = params.channel.unwrap_or_else(|| "All".to_string());

    respond(client.suggest_properties(&terms, page_size, &channel).await)
}

pub(crate) async fn property_handler<T>(
    State(client): State<Arc<DomainClient<T>>>,
    Path(id): Path<String>,
) -> Response
where
    T: DomainTransport + 'static,
{
    respond(client.property(&id).await)
}

pub(crate) async fn commercial_handler<T>(
    State(client): State<Arc<DomainClient<T>>>,
    Json(criteria): Json<Value>,
) -> Response
where
    T: DomainTransport + 'static,
{
    respond(client.search_commercial_listings(criteria).await)
}

pub(crate) async fn residential_handler<T>(
    State(client): State<Arc<DomainClient<T>>>,
    Json(criteria): Json<Value>,
) -> Response
where
    T: DomainTransport + 'static,
{
    respond(client.search_residential_listings(criteria).await)
}

pub(crate) async fn demographics_handler<T>(
    State(client): State<Arc<DomainClient<T>>>,
    Path(region): Path<RegionParams>,
    Query(params): Query<DemographicsParams>,
) -> Response
where
    T: DomainTransport + 'static,
{
    respond(
        client
            .demographics(
                &region.state,
                &region.suburb,
                region.postcode.as_deref(),
                params.types.as_deref(),
            )
            .await,
    )
}

pub(crate) async fn stats_handler<T>(
    State(client): State<Arc<DomainClient<T>>>,
    Path(region): Path<RegionParams>,
    Query(query): Query<SuburbStatsQuery>,
) -> Response
where
    T: DomainTransport + 'static,
{
    respond(
        client
            .suburb_performance(
                &region.state,
                &region.suburb,
                region.postcode.as_deref(),
                &query,
            )
            .await,
    )
}

pub(crate) async fn sales_handler<T>(
    State(client): State<Arc<DomainClient<T>>>,
    Path(city): Path<String>,
) -> Response
where
    T: DomainTransport + 'static,
{
    respond(client.sales_results(&city).await)
}

pub(crate) async fn status_handler<T>(State(client): State<Arc<DomainClient<T>>>) -> Response
where
    T: DomainTransport + 'static,
{
    let status = client.status().await;
    (
        StatusCode::OK,
        Json(json!({ "success": true, "data": status })),
    )
        .into_response()
}
