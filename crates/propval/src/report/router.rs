use axum::{routing::post, Json, Router};

use super::bundle::AssessmentBundle;
use super::sections::{validate_and_filter_report_data, ReportValidation};

/// Router exposing the report generation gate.
pub fn report_router() -> Router {
    Router::new().route("/api/v1/reports/validate", post(validate_handler))
}

/// Always 200: an incomplete bundle is reported in the body, not as an error status.
pub(crate) async fn validate_handler(Json(bundle): Json<AssessmentBundle>) -> Json<ReportValidation> {
    Json(validate_and_filter_report_data(&bundle))
}
