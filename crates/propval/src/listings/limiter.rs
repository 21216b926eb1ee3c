use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::warn;

use super::clock::Clock;

const LIMIT_WINDOW_SECS: i64 = 60;
/// Expired client windows are swept once the table grows past this size.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after_secs: i64 },
}

#[derive(Debug, Clone, Copy)]
struct ClientWindow {
    count: u32,
    resets_at: DateTime<Utc>,
}

/// Fixed-window cap on proxy requests per client.
pub struct ClientRateLimiter {
    max_requests: u32,
    clock: Arc<dyn Clock>,
    clients: Mutex<HashMap<String, ClientWindow>>,
}

impl ClientRateLimiter {
    pub fn new(max_requests: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_requests,
            clock,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn check(&self, client: &str) -> RateDecision {
        let now = self.clock.now();
        let mut clients = self.clients.lock().expect("rate limiter mutex poisoned");

        if clients.len() > PRUNE_THRESHOLD {
            clients.retain(|_, window| now < window.resets_at);
        }

        let window = clients.entry(client.to_string()).or_insert(ClientWindow {
            count: 0,
            resets_at: now + Duration::seconds(LIMIT_WINDOW_SECS),
        });
        if now >= window.resets_at {
            window.count = 0;
            window.resets_at = now + Duration::seconds(LIMIT_WINDOW_SECS);
        }

        if window.count >= self.max_requests {
            let retry_after_secs = (window.resets_at - now).num_seconds().max(1);
            return RateDecision::Limited { retry_after_secs };
        }

        window.count += 1;
        RateDecision::Allowed {
            remaining: self.max_requests - window.count,
        }
    }
}

/// Identify the caller: first forwarded hop, then the socket peer.
pub(crate) fn client_key(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    if let Some(forwarded) = forwarded {
        return forwarded.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn enforce_client_limit(
    State(limiter): State<Arc<ClientRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_key(&request);
    match limiter.check(&client) {
        RateDecision::Allowed { .. } => next.run(request).await,
        RateDecision::Limited { retry_after_secs } => {
            warn!(%client, retry_after_secs, "client exceeded listings request limit");
            let payload = json!({
                "error": format!(
                    "Too many requests. Limit is {} per minute.",
                    limiter.max_requests()
                ),
                "retryAfter": retry_after_secs,
            });
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                Json(payload),
            )
                .into_response()
        }
    }
}
