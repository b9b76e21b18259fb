//! Account client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ACCOUNT_BASE_URL` - Origin serving the account API (outside development)
//!
//! ## Optional
//! - `ACCOUNT_ENVIRONMENT` - `development` or `production` (default: production)
//! - `ACCOUNT_DEV_API_URL` - API endpoint used in development (default: <http://localhost:5000>)
//! - `ACCOUNT_REQUEST_TIMEOUT_SECS` - Per-request timeout in seconds (default: 15)
//! - `ACCOUNT_ORDER_PAGE_SIZE` - Orders fetched per page (default: 10)
//! - `ACCOUNT_DEFAULT_COUNTRY` - Country used when a profile has none (default: empty)

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_DEV_API_URL: &str = "http://localhost:5000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
const DEFAULT_ORDER_PAGE_SIZE: u32 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Deployment environment, which decides where the API lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development against a separately running API server.
    Development,
    /// Deployed next to the API; requests go to the deployment origin.
    #[default]
    Production,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!("invalid environment: {s}")),
        }
    }
}

/// Account client configuration.
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Base URL every API path is appended to
    pub api_base_url: Url,
    /// Upper bound on any single network operation
    pub request_timeout: Duration,
    /// Number of orders requested per fetch
    pub order_page_size: u32,
    /// Country seeded into a profile draft when the profile has none.
    ///
    /// Left empty until the intended default is confirmed; deployments set
    /// `ACCOUNT_DEFAULT_COUNTRY`.
    pub default_country: String,
}

impl AccountConfig {
    /// Create a configuration for the given API base URL with default settings.
    #[must_use]
    pub fn new(environment: Environment, api_base_url: Url) -> Self {
        Self {
            environment,
            api_base_url,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            order_page_size: DEFAULT_ORDER_PAGE_SIZE,
            default_country: String::new(),
        }
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the fallback country used when seeding profile drafts.
    #[must_use]
    pub fn with_default_country(mut self, country: impl Into<String>) -> Self {
        self.default_country = country.into();
        self
    }

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
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = match lookup("ACCOUNT_ENVIRONMENT") {
            Some(value) => value
                .parse::<Environment>()
                .map_err(|e| ConfigError::InvalidEnvVar("ACCOUNT_ENVIRONMENT".to_string(), e))?,
            None => Environment::default(),
        };

        let (key, raw_url) = match environment {
            Environment::Development => (
                "ACCOUNT_DEV_API_URL",
                lookup("ACCOUNT_DEV_API_URL").unwrap_or_else(|| DEFAULT_DEV_API_URL.to_string()),
            ),
            Environment::Production => (
                "ACCOUNT_BASE_URL",
                lookup("ACCOUNT_BASE_URL")
                    .ok_or_else(|| ConfigError::MissingEnvVar("ACCOUNT_BASE_URL".to_string()))?,
            ),
        };
        let api_base_url = parse_base_url(key, &raw_url)?;

        let timeout_secs = parse_or_default(
            &lookup,
            "ACCOUNT_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "ACCOUNT_REQUEST_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let order_page_size =
            parse_or_default(&lookup, "ACCOUNT_ORDER_PAGE_SIZE", DEFAULT_ORDER_PAGE_SIZE)?;
        if order_page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "ACCOUNT_ORDER_PAGE_SIZE".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            environment,
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            order_page_size,
            default_country: lookup("ACCOUNT_DEFAULT_COUNTRY").unwrap_or_default(),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a base URL, requiring an http(s) scheme.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Parse an optional variable, falling back to a default when unset.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |value| {
        value
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AccountConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AccountConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_development_uses_local_endpoint() {
        let config = load(&[("ACCOUNT_ENVIRONMENT", "development")]).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.api_base_url.as_str(), "http://localhost:5000/");
    }

    #[test]
    fn test_production_requires_base_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "ACCOUNT_BASE_URL"));
    }

    #[test]
    fn test_production_uses_origin() {
        let config = load(&[("ACCOUNT_BASE_URL", "https://shop.example.com")]).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.api_base_url.host_str(), Some("shop.example.com"));
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("ACCOUNT_ENVIRONMENT", "dev")]).unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.order_page_size, 10);
        assert_eq!(config.default_country, "");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ACCOUNT_ENVIRONMENT", "development"),
            ("ACCOUNT_DEV_API_URL", "http://127.0.0.1:8080"),
            ("ACCOUNT_REQUEST_TIMEOUT_SECS", "3"),
            ("ACCOUNT_DEFAULT_COUNTRY", "Canada"),
        ])
        .unwrap();
        assert_eq!(config.api_base_url.port(), Some(8080));
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.default_country, "Canada");
    }

    #[test]
    fn test_invalid_environment() {
        let err = load(&[("ACCOUNT_ENVIRONMENT", "staging")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = load(&[
            ("ACCOUNT_ENVIRONMENT", "development"),
            ("ACCOUNT_REQUEST_TIMEOUT_SECS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = load(&[
            ("ACCOUNT_ENVIRONMENT", "development"),
            ("ACCOUNT_ORDER_PAGE_SIZE", "0"),
        ])
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "ACCOUNT_ORDER_PAGE_SIZE")
        );
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        let err = load(&[("ACCOUNT_BASE_URL", "ftp://shop.example.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }
}
