/// Failures talking to the Domain listings API.
#[derive(Debug, thiserror::Error)]
pub enum ListingsError {
    #[error("Domain API credentials are not configured (set DOMAIN_CLIENT_ID and DOMAIN_CLIENT_SECRET)")]
    MissingCredentials,
    #[error("failed to obtain Domain API token: {status} {body}")]
    Authentication { status: u16, body: String },
    #[error("Domain API request failed: {status} {body}")]
    Upstream { status: u16, body: String },
    #[error("Domain API transport error: {0}")]
    Transport(String),
    #[error("invalid Domain API response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Domain API token lifetime out of range: expires_in = {expires_in}")]
    TokenLifetime { expires_in: i64 },
    #[error("invalid Domain API url: {0}")]
    InvalidUrl(String),
}
