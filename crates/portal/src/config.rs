//! Portal configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PORTAL_BASE_URL` - Public URL of the portal (decides Secure cookies)
//! - `API_BASE_URL` - Base URL of the laundry REST API
//!
//! ## Optional
//! - `PORTAL_HOST` - Bind address (default: 127.0.0.1)
//! - `PORTAL_PORT` - Listen port (default: 3000)
//! - `API_KEY` - Service key sent as `x-api-key` on every API request
//! - `API_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `QUERY_STALE_SECS` - How long cached query results stay fresh (default: 60)
//! - `QUERY_CACHE_CAPACITY` - Maximum cached query results (default: 10000)
//! - `SESSION_EXPIRY_HOURS` - Session inactivity expiry (default: 24)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - 0.0 to 1.0 (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
const DEFAULT_QUERY_STALE_SECS: u64 = 60;
const DEFAULT_QUERY_CACHE_CAPACITY: u64 = 10_000;
const DEFAULT_SESSION_EXPIRY_HOURS: u64 = 24;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Portal application configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the portal
    pub base_url: String,
    /// Laundry REST API configuration
    pub api: ApiConfig,
    /// Query cache configuration
    pub query: QueryConfig,
    /// Session inactivity expiry
    pub session_expiry: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Laundry REST API configuration.
///
/// Implements `Debug` manually to redact the service key.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL; endpoint paths are appended to it.
    pub base_url: Url,
    /// Optional service key.
    pub api_key: Option<SecretString>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiConfig {
    /// Configuration pointing at `base_url` with defaults for the rest.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_api_base_url("API_BASE_URL", base_url)?,
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_required_env("API_BASE_URL")?;
        Ok(Self {
            base_url: parse_api_base_url("API_BASE_URL", &raw)?,
            api_key: get_optional_env("API_KEY").map(SecretString::from),
            timeout: Duration::from_secs(get_positive_u64(
                "API_TIMEOUT_SECS",
                DEFAULT_API_TIMEOUT_SECS,
            )?),
        })
    }
}

/// Query cache configuration.
#[derive(Debug, Clone, Copy)]
pub struct QueryConfig {
    /// Default time a cached result is served before refetching.
    pub stale_time: Duration,
    /// Maximum number of cached results across all users.
    pub capacity: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(DEFAULT_QUERY_STALE_SECS),
            capacity: DEFAULT_QUERY_CACHE_CAPACITY,
        }
    }
}

impl QueryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            stale_time: Duration::from_secs(get_positive_u64(
                "QUERY_STALE_SECS",
                DEFAULT_QUERY_STALE_SECS,
            )?),
            capacity: get_positive_u64("QUERY_CACHE_CAPACITY", DEFAULT_QUERY_CACHE_CAPACITY)?,
        })
    }
}

impl PortalConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("PORTAL_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORTAL_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORTAL_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORTAL_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("PORTAL_BASE_URL")?;
        let session_hours = get_positive_u64("SESSION_EXPIRY_HOURS", DEFAULT_SESSION_EXPIRY_HOURS)?;

        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            base_url,
            api: ApiConfig::from_env()?,
            query: QueryConfig::from_env()?,
            session_expiry: Duration::from_secs(session_hours * 60 * 60),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Configuration for tests and local tooling: no Sentry, default cache.
    #[must_use]
    pub fn local(api: ApiConfig) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            api,
            query: QueryConfig::default(),
            session_expiry: Duration::from_secs(DEFAULT_SESSION_EXPIRY_HOURS * 60 * 60),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the portal is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable or a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get a strictly positive integer, falling back to `default` when unset.
fn get_positive_u64(key: &str, default: u64) -> Result<u64, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |raw| parse_positive_u64(key, &raw))
}

fn parse_positive_u64(key: &str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        )),
        Ok(value) => Ok(value),
        Err(e) => Err(ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}

/// Parse the API base URL, normalizing it to end with `/` so relative
/// endpoint paths are appended rather than replacing the last segment.
fn parse_api_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme {}", url.scheme()),
        ));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not contain a query string or fragment".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_url_gets_trailing_slash() {
        let url = parse_api_base_url("API_BASE_URL", "https://api.freshwash.id/v1").unwrap();
        assert_eq!(url.as_str(), "https://api.freshwash.id/v1/");
        assert_eq!(
            url.join("orders").unwrap().as_str(),
            "https://api.freshwash.id/v1/orders"
        );
    }

    #[test]
    fn test_api_base_url_rejects_other_schemes() {
        let err = parse_api_base_url("API_BASE_URL", "ftp://api.freshwash.id").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "API_BASE_URL"));
    }

    #[test]
    fn test_api_base_url_rejects_query() {
        assert!(parse_api_base_url("API_BASE_URL", "http://localhost:8000/?x=1").is_err());
        assert!(parse_api_base_url("API_BASE_URL", "not a url").is_err());
    }

    #[test]
    fn test_positive_u64() {
        assert_eq!(parse_positive_u64("X", " 45 ").unwrap(), 45);
        assert!(parse_positive_u64("X", "0").is_err());
        assert!(parse_positive_u64("X", "-3").is_err());
        assert!(parse_positive_u64("X", "soon").is_err());
    }

    #[test]
    fn test_api_config_debug_redacts_key() {
        let mut api = ApiConfig::new("http://localhost:8000").unwrap();
        api.api_key = Some(SecretString::from("sk_live_abcdef"));
        let debug = format!("{api:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk_live_abcdef"));
    }

    #[test]
    fn test_local_config_is_insecure() {
        let config = PortalConfig::local(ApiConfig::new("http://localhost:8000").unwrap());
        assert!(!config.is_secure());
        assert_eq!(config.socket_addr().port(), 3000);
    }
}
