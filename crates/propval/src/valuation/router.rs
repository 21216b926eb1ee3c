use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use super::digital::{calculate_digital_display_value, DigitalDisplayValuationInput};
use super::outcome::{AdvertisingValuation, ValuationError};
use super::signage::{calculate_advertising_signage_value, SignageValuationInput};

pub fn valuation_router() -> Router {
    Router::new()
        .route("/api/v1/valuations/signage", post(signage_handler))
        .route("/api/v1/valuations/digital", post(digital_handler))
}

fn respond(result: Result<AdvertisingValuation, ValuationError>) -> Response {
    match result {
        Ok(valuation) => (StatusCode::OK, Json(valuation)).into_response(),
        Err(err) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}

pub(crate) async fn signage_handler(Json(input): Json<SignageValuationInput>) -> Response {
    respond(calculate_advertising_signage_value(&input))
}

pub(crate) async fn digital_handler(Json(input): Json<DigitalDisplayValuationInput>) -> Response {
    respond(calculate_digital_display_value(&input))
}
