use super::common::*;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::listings::limiter::ClientRateLimiter;
use crate::listings::router::listings_router;

fn router_with_limit(max_requests: u32) -> (axum::Router, Arc<ScriptedTransport>) {
    let clock = Arc::new(ManualClock::starting_at(0));
    let (client, transport) = build_client(domain_config(), clock.clone());
    let limiter = Arc::new(ClientRateLimiter::new(max_requests, clock));
    (listings_router(client, limiter), transport)
}

fn get(uri: &str, client_ip: &str) -> Request<Body> {
    Request::get(uri)
        .header("x-forwarded-for", client_ip)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn suggest_wraps_upstream_payload() {
    let (router, transport) = router_with_limit(45);
    transport.push_api_response(response(200, json!([{ "address": "1 George St" }])));

    let response = router
        .oneshot(get("/api/v1/domain/suggest?terms=1%20George&pageSize=5", "198.51.100.1"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"][0]["address"], json!("1 George St"));

    let request = transport.api_requests().pop().expect("api request recorded");
    assert!(request
        .query
        .contains(&("terms".to_string(), "1 George".to_string())));
    assert!(request
        .query
        .contains(&("pageSize".to_string(), "5".to_string())));
}

#[tokio::test]
async fn suggest_requires_terms() {
    let (router, transport) = router_with_limit(45);

    let response = router
        .oneshot(get("/api/v1/domain/suggest", "198.51.100.1"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(transport.api_requests().is_empty());
}

#[tokio::test]
async fn upstream_errors_become_internal_errors() {
    let (router, transport) = router_with_limit(45);
    transport.push_api_response(response(404, json!({ "message": "not found" })));

    let response = router
        .oneshot(get("/api/v1/domain/properties/XY-123", "198.51.100.1"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.contains("404")));
}

#[tokio::test]
async fn residential_search_forwards_body() {
    let (router, transport) = router_with_limit(45);

    let response = router
        .oneshot(
            Request::post("/api/v1/domain/listings/residential")
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-forwarded-for", "198.51.100.1")
                .body(Body::from(json!({ "listingType": "Rent" }).to_string()))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let request = transport.api_requests().pop().expect("api request recorded");
    assert!(request.url.ends_with("/v1/listings/residential/_search"));
}

#[tokio::test]
async fn encoded_path_parameters_cannot_leave_their_route() {
    let (router, transport) = router_with_limit(45);

    for uri in [
        "/api/v1/domain/properties/..%2F..%2Fv2%2Fagencies",
        "/api/v1/domain/sales/Sydney%3FpageSize%3D999",
    ] {
        let response = router
            .clone()
            .oneshot(get(uri, "198.51.100.1"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let requests = transport.api_requests();
    assert_eq!(
        requests[0].url,
        "https://api.example.test/v1/properties/..%2F..%2Fv2%2Fagencies"
    );
    assert_eq!(
        requests[1].url,
        "https://api.example.test/v1/salesResults/Sydney%3FpageSize=999"
    );
    assert!(requests.iter().all(|request| request.query.is_empty()));
}

#[tokio::test]
async fn optional_postcode_routes_both_shapes() {
    let (router, transport) = router_with_limit(45);

    for uri in [
        "/api/v1/domain/stats/NSW/Newtown",
        "/api/v1/domain/stats/NSW/Newtown/2042",
    ] {
        let response = router
            .clone()
            .oneshot(get(uri, "198.51.100.1"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let urls: Vec<String> = transport
        .api_requests()
        .into_iter()
        .map(|request| request.url)
        .collect();
    assert!(urls[0].ends_with("/v2/suburbPerformanceStatistics/NSW/Newtown"));
    assert!(urls[1].ends_with("/v2/suburbPerformanceStatistics/NSW/Newtown/2042"));
}

#[tokio::test]
async fn limiter_returns_too_many_requests_with_retry_hint() {
    let (router, transport) = router_with_limit(2);

    for _ in 0..2 {
        let response = router
            .clone()
            .oneshot(get("/api/v1/domain/sales/Melbourne", "203.0.113.7"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let limited = router
        .clone()
        .oneshot(get("/api/v1/domain/sales/Melbourne", "203.0.113.7"))
        .await
        .expect("router responds");
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        limited
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok()),
        Some("60")
    );
    let body = read_json_body(limited).await;
    assert_eq!(body["retryAfter"], json!(60));
    assert_eq!(transport.api_requests().len(), 2);

    let other_client = router
        .oneshot(get("/api/v1/domain/sales/Melbourne", "203.0.113.8"))
        .await
        .expect("router responds");
    assert_eq!(other_client.status(), StatusCode::OK);
}

#[tokio::test]
async fn status_route_reports_bookkeeping() {
    let (router, _transport) = router_with_limit(45);

    router
        .clone()
        .oneshot(get("/api/v1/domain/sales/Perth", "198.51.100.1"))
        .await
        .expect("router responds");
    let response = router
        .oneshot(get("/api/v1/domain/status", "198.51.100.1"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["data"]["requestsThisMinute"], json!(1));
    assert_eq!(body["data"]["tokenCached"], json!(true));
}
