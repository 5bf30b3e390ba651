//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CART_API_BASE_URL` - Base URL of the storefront REST API (http or https)
//!
//! ## Optional
//! - `CART_API_TOKEN` - Bearer token of the signed-in customer
//! - `CART_API_TIMEOUT_SECS` - Request timeout in seconds (default: HTTP client default)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart client configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API, always ending in `/`
    pub base_url: Url,
    /// Bearer token sent with every request
    pub api_token: Option<SecretString>,
    /// Request timeout; `None` keeps the HTTP client default
    pub timeout: Option<Duration>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl ClientConfig {
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

        let base_url = parse_base_url(&get_required_env("CART_API_BASE_URL")?)
            .map_err(|e| ConfigError::InvalidEnvVar("CART_API_BASE_URL".to_string(), e))?;
        let api_token = get_optional_env("CART_API_TOKEN").map(SecretString::from);
        let timeout = get_optional_env("CART_API_TIMEOUT_SECS")
            .map(|raw| parse_timeout(&raw))
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("CART_API_TIMEOUT_SECS".to_string(), e))?;

        Ok(Self {
            base_url,
            api_token,
            timeout,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration pointing at `base_url` with no token, timeout or Sentry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL cannot be used as an API base.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("CART_API_BASE_URL".to_string(), e))?;
        Ok(Self {
            base_url,
            api_token: None,
            timeout: None,
            sentry_dsn: None,
            sentry_environment: None,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse and normalize the API base URL.
///
/// The path is forced to end with `/` so that `Url::join` appends endpoint
/// paths instead of replacing the last segment.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.cannot_be_a_base() {
        return Err("URL cannot be used as a base".to_string());
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Parse a positive timeout in whole seconds.
fn parse_timeout(raw: &str) -> Result<Duration, String> {
    let secs = raw.trim().parse::<u64>().map_err(|e| e.to_string())?;
    if secs == 0 {
        return Err("timeout must be at least 1 second".to_string());
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_adds_trailing_slash() {
        let url = parse_base_url("https://shop.example.vn/backend").unwrap();
        assert_eq!(url.as_str(), "https://shop.example.vn/backend/");
        assert_eq!(
            url.join("api/cart/sellers").unwrap().as_str(),
            "https://shop.example.vn/backend/api/cart/sellers"
        );
    }

    #[test]
    fn test_parse_base_url_root() {
        let url = parse_base_url("http://localhost:8080").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        assert!(parse_base_url("ftp://example.com").is_err());
        assert!(parse_base_url("mailto:cart@example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("30").unwrap(), Duration::from_secs(30));
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("soon").is_err());
    }

    #[test]
    fn test_config_debug_redacts_token() {
        let mut config = ClientConfig::for_base_url("https://api.example.vn").unwrap();
        config.api_token = Some(SecretString::from("super_secret_bearer_token"));

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("https://api.example.vn/"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_bearer_token"));
    }
}
