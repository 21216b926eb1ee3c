use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info};

use super::clock::Clock;
use super::error::ListingsError;
use super::governor::{log_request_rate, log_upstream_quota, RequestWindow};
use super::token::{CachedToken, TokenResponse};
use super::transport::{DomainTransport, HttpMethod, OutboundBody, OutboundRequest};
use crate::config::DomainApiConfig;

/// Method, query and body for one listings API call.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    pub method: HttpMethod,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl FetchOptions {
    pub fn get() -> Self {
        Self {
            method: HttpMethod::Get,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

/// Suburb performance statistics filters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuburbStatsQuery {
    pub property_category: String,
    pub bedrooms: u8,
    pub period_size: String,
    pub starting_period_relative_to_current: u8,
    pub total_periods: u8,
}

impl Default for SuburbStatsQuery {
    fn default() -> Self {
        Self {
            property_category: "house".to_string(),
            bedrooms: 3,
            period_size: "quarters".to_string(),
            starting_period_relative_to_current: 1,
            total_periods: 4,
        }
    }
}

/// Snapshot of the client's bookkeeping for the status route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainStatus {
    pub credentials_configured: bool,
    pub requests_this_minute: u32,
    pub window_resets_at: Option<DateTime<Utc>>,
    pub token_cached: bool,
    pub token_expires_at: Option<DateTime<Utc>>,
}

/// Domain API client owning the token cache and the outbound request window.
///
/// Shared between handlers behind an `Arc`. The token slot is an async mutex
/// held across a refresh, so concurrent callers wait for one refresh rather
/// than racing several.
pub struct DomainClient<T> {
    config: DomainApiConfig,
    base_url: Url,
    transport: Arc<T>,
    clock: Arc<dyn Clock>,
    token: AsyncMutex<Option<CachedToken>>,
    requests: Mutex<RequestWindow>,
}

impl<T> DomainClient<T>
where
    T: DomainTransport + 'static,
{
    pub fn new(
        config: DomainApiConfig,
        transport: Arc<T>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ListingsError> {
        let mut raw = config.api_base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw)
            .map_err(|err| ListingsError::InvalidUrl(format!("{}: {err}", config.api_base_url)))?;

        Ok(Self {
            config,
            base_url,
            transport,
            clock,
            token: AsyncMutex::new(None),
            requests: Mutex::new(RequestWindow::default()),
        })
    }

    /// Cached bearer token, refreshed through the client-credentials grant once expired.
    pub async fn get_access_token(&self) -> Result<String, ListingsError> {
        let mut slot = self.token.lock().await;
        let now = self.clock.now();
        if let Some(cached) = slot.as_ref().filter(|cached| cached.is_valid_at(now)) {
            return Ok(cached.token.clone());
        }

        *slot = None;
        let refreshed = self.request_token(now).await?;
        let token = refreshed.token.clone();
        info!(expires_at = %refreshed.expires_at, "Domain API token refreshed");
        *slot = Some(refreshed);
        Ok(token)
    }

    async fn request_token(&self, refreshed_at: DateTime<Utc>) -> Result<CachedToken, ListingsError> {
        let (Some(client_id), Some(client_secret)) =
            (&self.config.client_id, &self.config.client_secret)
        else {
            return Err(ListingsError::MissingCredentials);
        };

        let mut request = OutboundRequest::new(HttpMethod::Post, self.config.auth_url.clone());
        request.basic_auth = Some((client_id.clone(), client_secret.clone()));
        request.body = Some(OutboundBody::Form(vec![
            ("grant_type".to_string(), "client_credentials".to_string()),
            ("scope".to_string(), self.config.scope.clone()),
        ]));

        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            return Err(ListingsError::Authentication {
                status: response.status,
                body: response.body,
            });
        }

        let grant: TokenResponse = serde_json::from_str(&response.body)?;
        CachedToken::issued(grant, refreshed_at)
    }

    fn record_request(&self) -> u32 {
        let now = self.clock.now();
        let mut window = self.requests.lock().expect("request window mutex poisoned");
        window.record(now)
    }

    /// Issue one authenticated call against a fixed listings API path.
    ///
    /// The request is counted before the token is resolved, so failed token
    /// refreshes still consume budget.
    pub async fn domain_fetch(&self, path: &str, options: FetchOptions) -> Result<Value, ListingsError> {
        let url = self.endpoint(path)?;
        self.dispatch(url, options).await
    }

    /// Like [`Self::domain_fetch`], with caller-supplied values appended as
    /// percent-encoded path segments under `prefix`.
    async fn fetch_resource(
        &self,
        prefix: &str,
        params: &[&str],
        options: FetchOptions,
    ) -> Result<Value, ListingsError> {
        let url = self.resource_url(prefix, params)?;
        self.dispatch(url, options).await
    }

    async fn dispatch(&self, url: Url, options: FetchOptions) -> Result<Value, ListingsError> {
        let requests_this_minute = self.record_request();
        log_request_rate(requests_this_minute);

        let token = self.get_access_token().await?;
        debug!(%url, requests_this_minute, "calling Domain API");

        let FetchOptions {
            method,
            query,
            body,
        } = options;
        let mut request = OutboundRequest::new(method, url);
        request.query = query;
        request.bearer_token = Some(token);
        request.body = body.map(OutboundBody::Json);

        let response = self.transport.execute(request).await?;
        log_upstream_quota(&response);

        if !response.is_success() {
            return Err(ListingsError::Upstream {
                status: response.status,
                body: response.body,
            });
        }

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ListingsError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ListingsError::InvalidUrl(format!("{path}: {err}")))
    }

    fn resource_url(&self, prefix: &str, params: &[&str]) -> Result<Url, ListingsError> {
        let mut url = self.endpoint(prefix)?;
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                ListingsError::InvalidUrl(format!("{prefix}: base url cannot carry a path"))
            })?;
            segments.pop_if_empty();
            for param in params {
                // `push` encodes '/', '?' and '#', but leaves dot segments alone.
                if matches!(param.trim(), "" | "." | "..") {
                    return Err(ListingsError::InvalidUrl(format!(
                        "{prefix}: invalid path segment '{param}'"
                    )));
                }
                segments.push(param);
            }
        }
        Ok(url)
    }

    pub async fn suggest_properties(
        &self,
        terms: &str,
        page_size: u32,
        channel: &str,
    ) -> Result<Value, ListingsError> {
        self.domain_fetch(
            "/v1/properties/_suggest",
            FetchOptions::get()
                .with_query("terms", terms)
                .with_query("pageSize", page_size)
                .with_query("channel", channel),
        )
        .await
    }

    pub async fn property(&self, id: &str) -> Result<Value, ListingsError> {
        self.fetch_resource("/v1/properties", &[id], FetchOptions::get())
            .await
    }

    pub async fn search_commercial_listings(&self, criteria: Value) -> Result<Value, ListingsError> {
        self.domain_fetch("/v1/listings/commercial/_search", FetchOptions::post(criteria))
            .await
    }

    pub async fn search_residential_listings(
        &self,
        criteria: Value,
    ) -> Result<Value, ListingsError> {
        self.domain_fetch(
            "/v1/listings/residential/_search",
            FetchOptions::post(criteria),
        )
        .await
    }

    pub async fn demographics(
        &self,
        state: &str,
        suburb: &str,
        postcode: Option<&str>,
        types: Option<&str>,
    ) -> Result<Value, ListingsError> {
        let mut options = FetchOptions::get();
        if let Some(types) = types {
            options = options.with_query("types", types);
        }
        self.fetch_resource(
            "/v2/demographics",
            &region_segments(state, suburb, postcode),
            options,
        )
        .await
    }

    pub async fn suburb_performance(
        &self,
        state: &str,
        suburb: &str,
        postcode: Option<&str>,
        query: &SuburbStatsQuery,
    ) -> Result<Value, ListingsError> {
        let options = FetchOptions::get()
            .with_query("propertyCategory", &query.property_category)
            .with_query("bedrooms", query.bedrooms)
            .with_query("periodSize", &query.period_size)
            .with_query(
                "startingPeriodRelativeToCurrent",
                query.starting_period_relative_to_current,
            )
            .with_query("totalPeriods", query.total_periods);
        self.fetch_resource(
            "/v2/suburbPerformanceStatistics",
            &region_segments(state, suburb, postcode),
            options,
        )
        .await
    }

    pub async fn sales_results(&self, city: &str) -> Result<Value, ListingsError> {
        self.fetch_resource("/v1/salesResults", &[city], FetchOptions::get())
            .await
    }

    pub async fn status(&self) -> DomainStatus {
        let now = self.clock.now();
        let (requests_this_minute, window_resets_at) = {
            let window = self.requests.lock().expect("request window mutex poisoned");
            (window.current(now), window.resets_at())
        };
        let token_expires_at = self
            .token
            .lock()
            .await
            .as_ref()
            .filter(|cached| cached.is_valid_at(now))
            .map(|cached| cached.expires_at);

        DomainStatus {
            credentials_configured: self.config.has_credentials(),
            requests_this_minute,
            window_resets_at,
            token_cached: token_expires_at.is_some(),
            token_expires_at,
        }
    }
}

fn region_segments<'a>(state: &'a str, suburb: &'a str, postcode: Option<&'a str>) -> Vec<&'a str> {
    let mut segments = vec![state, suburb];
    if let Some(postcode) = postcode.map(str::trim).filter(|postcode| !postcode.is_empty()) {
        segments.push(postcode);
    }
    segments
}
