use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_DOMAIN_API_BASE_URL: &str = "https://api.domain.com.au";
const DEFAULT_DOMAIN_AUTH_URL: &str = "https://auth.domain.com.au/v1/connect/token";
const DEFAULT_DOMAIN_SCOPE: &str = "api_listings_read api_properties_read api_demographics_read api_salesresults_read api_suburbperformance_read";
const DEFAULT_CLIENT_RATE_LIMIT: u32 = 45;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub domain: DomainApiConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            domain: DomainApiConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Credentials and endpoints for the Domain listings API.
///
/// Credentials are optional at load time so the validation and valuation
/// endpoints can run without them; the first token refresh fails instead.
#[derive(Clone)]
pub struct DomainApiConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_base_url: String,
    pub auth_url: String,
    pub scope: String,
    /// Hard per-client cap enforced by the proxy routes.
    pub client_requests_per_minute: u32,
}

impl DomainApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let client_requests_per_minute = match env::var("DOMAIN_CLIENT_RATE_LIMIT") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidRateLimit { value: raw })?,
            Err(_) => DEFAULT_CLIENT_RATE_LIMIT,
        };

        Ok(Self {
            client_id: non_blank_var("DOMAIN_CLIENT_ID"),
            client_secret: non_blank_var("DOMAIN_CLIENT_SECRET"),
            api_base_url: env::var("DOMAIN_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_DOMAIN_API_BASE_URL.to_string()),
            auth_url: env::var("DOMAIN_AUTH_URL")
                .unwrap_or_else(|_| DEFAULT_DOMAIN_AUTH_URL.to_string()),
            scope: env::var("DOMAIN_SCOPE").unwrap_or_else(|_| DEFAULT_DOMAIN_SCOPE.to_string()),
            client_requests_per_minute,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }
}

impl Default for DomainApiConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_base_url: DEFAULT_DOMAIN_API_BASE_URL.to_string(),
            auth_url: DEFAULT_DOMAIN_AUTH_URL.to_string(),
            scope: DEFAULT_DOMAIN_SCOPE.to_string(),
            client_requests_per_minute: DEFAULT_CLIENT_RATE_LIMIT,
        }
    }
}

// Keeps the secret out of logs when the config is printed with `?config`.
impl fmt::Debug for DomainApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainApiConfig")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("api_base_url", &self.api_base_url)
            .field("auth_url", &self.auth_url)
            .field("scope", &self.scope)
            .field(
                "client_requests_per_minute",
                &self.client_requests_per_minute,
            )
            .finish()
    }
}

fn non_blank_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRateLimit { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRateLimit { value } => write!(
                f,
                "DOMAIN_CLIENT_RATE_LIMIT must be a positive integer (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidRateLimit { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "DOMAIN_CLIENT_ID",
            "DOMAIN_CLIENT_SECRET",
            "DOMAIN_API_BASE_URL",
            "DOMAIN_AUTH_URL",
            "DOMAIN_SCOPE",
            "DOMAIN_CLIENT_RATE_LIMIT",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.domain.api_base_url, "https://api.domain.com.au");
        assert_eq!(config.domain.client_requests_per_minute, 45);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn blank_credentials_count_as_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DOMAIN_CLIENT_ID", "client");
        env::set_var("DOMAIN_CLIENT_SECRET", "   ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.domain.client_id.as_deref(), Some("client"));
        assert!(config.domain.client_secret.is_none());
        assert!(!config.domain.has_credentials());
        reset_env();
    }

    #[test]
    fn rejects_zero_rate_limit() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DOMAIN_CLIENT_RATE_LIMIT", "0");
        let err = AppConfig::load().expect_err("zero limit rejected");
        assert!(matches!(err, ConfigError::InvalidRateLimit { .. }));
        reset_env();
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = DomainApiConfig {
            client_secret: Some("hunter2".to_string()),
            ..DomainApiConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
