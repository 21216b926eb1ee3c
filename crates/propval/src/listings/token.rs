use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use super::error::ListingsError;

/// Seconds shaved off the provider's lifetime so in-flight requests never carry a dead token.
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;
/// Upper bound on how long a token is cached, whatever the provider declares.
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 86_400;

/// Client-credentials grant response from the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

/// Bearer token plus the instant it stops being handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub(crate) fn issued(
        response: TokenResponse,
        refreshed_at: DateTime<Utc>,
    ) -> Result<Self, ListingsError> {
        let lifetime = response
            .expires_in
            .saturating_sub(TOKEN_EXPIRY_MARGIN_SECS)
            .clamp(0, MAX_TOKEN_LIFETIME_SECS);
        let expires_at = Duration::try_seconds(lifetime)
            .and_then(|lifetime| refreshed_at.checked_add_signed(lifetime))
            .ok_or(ListingsError::TokenLifetime {
                expires_in: response.expires_in,
            })?;

        Ok(Self {
            token: response.access_token,
            expires_at,
        })
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}
