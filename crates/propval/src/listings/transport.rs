use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use super::error::ListingsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutboundBody {
    Json(Value),
    Form(Vec<(String, String)>),
}

/// A fully resolved request to the listings API or its token endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub bearer_token: Option<String>,
    pub basic_auth: Option<(String, String)>,
    pub body: Option<OutboundBody>,
}

impl OutboundRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            bearer_token: None,
            basic_auth: None,
            body: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutboundResponse {
    pub status: u16,
    /// Header names are lower-cased.
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl OutboundResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Outbound HTTP seam so the client can be exercised without the network.
#[async_trait]
pub trait DomainTransport: Send + Sync {
    async fn execute(&self, request: OutboundRequest) -> Result<OutboundResponse, ListingsError>;
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ListingsError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("propval/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ListingsError::Transport(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DomainTransport for ReqwestTransport {
    async fn execute(&self, request: OutboundRequest) -> Result<OutboundResponse, ListingsError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some((user, password)) = &request.basic_auth {
            builder = builder.basic_auth(user, Some(password));
        }
        builder = match request.body {
            Some(OutboundBody::Json(body)) => builder.json(&body),
            Some(OutboundBody::Form(fields)) => builder.form(&fields),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|err| ListingsError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_ascii_lowercase(), value.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|err| ListingsError::Transport(err.to_string()))?;

        Ok(OutboundResponse {
            status,
            headers,
            body,
        })
    }
}
