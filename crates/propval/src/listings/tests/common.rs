use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use crate::config::DomainApiConfig;
use crate::listings::client::DomainClient;
use crate::listings::clock::Clock;
use crate::listings::error::ListingsError;
use crate::listings::transport::{DomainTransport, OutboundRequest, OutboundResponse};

pub(crate) const API_BASE: &str = "https://api.example.test";
pub(crate) const AUTH_URL: &str = "https://auth.example.test/v1/connect/token";
const EPOCH: i64 = 1_700_000_000;

pub(crate) fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(EPOCH + secs, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub(crate) fn starting_at(secs: i64) -> Self {
        Self {
            now: Mutex::new(at(secs)),
        }
    }

    pub(crate) fn set_secs(&self, secs: i64) {
        *self.now.lock().expect("clock mutex poisoned") = at(secs);
    }

    pub(crate) fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock().expect("clock mutex poisoned");
        *now += Duration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

pub(crate) fn response(status: u16, body: Value) -> OutboundResponse {
    OutboundResponse {
        status,
        headers: HashMap::new(),
        body: body.to_string(),
    }
}

/// Transport that answers from queued responses and records every request.
///
/// With an empty queue the token endpoint issues `token-N` valid for an hour
/// and the API answers `{"ok": true}`.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    requests: Mutex<Vec<OutboundRequest>>,
    token_responses: Mutex<VecDeque<OutboundResponse>>,
    api_responses: Mutex<VecDeque<OutboundResponse>>,
}

impl ScriptedTransport {
    pub(crate) fn push_token_response(&self, response: OutboundResponse) {
        self.token_responses
            .lock()
            .expect("transport mutex poisoned")
            .push_back(response);
    }

    pub(crate) fn push_api_response(&self, response: OutboundResponse) {
        self.api_responses
            .lock()
            .expect("transport mutex poisoned")
            .push_back(response);
    }

    pub(crate) fn token_requests(&self) -> Vec<OutboundRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.url == AUTH_URL)
            .collect()
    }

    pub(crate) fn api_requests(&self) -> Vec<OutboundRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.url != AUTH_URL)
            .collect()
    }

    fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().expect("transport mutex poisoned").clone()
    }
}

#[async_trait]
impl DomainTransport for ScriptedTransport {
    async fn execute(&self, request: OutboundRequest) -> Result<OutboundResponse, ListingsError> {
        let is_token = request.url == AUTH_URL;
        let token_number = {
            let mut requests = self.requests.lock().expect("transport mutex poisoned");
            requests.push(request);
            requests.iter().filter(|request| request.url == AUTH_URL).count()
        };

        if is_token {
            let queued = self
                .token_responses
                .lock()
                .expect("transport mutex poisoned")
                .pop_front();
            return Ok(queued.unwrap_or_else(|| {
                response(
                    200,
                    json!({
                        "access_token": format!("token-{token_number}"),
                        "expires_in": 3600,
                        "token_type": "Bearer"
                    }),
                )
            }));
        }

        let queued = self
            .api_responses
            .lock()
            .expect("transport mutex poisoned")
            .pop_front();
        Ok(queued.unwrap_or_else(|| response(200, json!({ "ok": true }))))
    }
}

pub(crate) fn domain_config() -> DomainApiConfig {
    DomainApiConfig {
        client_id: Some("client-id".to_string()),
        client_secret: Some("client-secret".to_string()),
        api_base_url: API_BASE.to_string(),
        auth_url: AUTH_URL.to_string(),
        ..DomainApiConfig::default()
    }
}

pub(crate) fn build_client(
    config: DomainApiConfig,
    clock: Arc<ManualClock>,
) -> (Arc<DomainClient<ScriptedTransport>>, Arc<ScriptedTransport>) {
    let transport = Arc::new(ScriptedTransport::default());
    let client = DomainClient::new(config, transport.clone(), clock).expect("client builds");
    (Arc::new(client), transport)
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
