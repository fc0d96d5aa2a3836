//! Client configuration.

use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable selecting the API host.
pub const API_URL_ENV: &str = "NDIS_ADMIN_API_URL";

/// Optional request timeout override, in seconds.
pub const TIMEOUT_ENV: &str = "NDIS_ADMIN_TIMEOUT_SECS";

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the admin API, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout: Duration::from_secs(30),
            user_agent: format!("ndis-admin/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Build configuration from the environment.
    ///
    /// `NDIS_ADMIN_API_URL` is required; `NDIS_ADMIN_TIMEOUT_SECS` overrides
    /// the 30s default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var(API_URL_ENV)
            .map_err(|_| ConfigError::MissingEnvVar(API_URL_ENV.to_string()))?;

        url::Url::parse(&base_url).map_err(|e| ConfigError::InvalidValue {
            key: API_URL_ENV.to_string(),
            message: e.to_string(),
        })?;

        let mut config = Self::new(base_url);
        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: TIMEOUT_ENV.to_string(),
                message: format!("expected integer seconds, got {raw:?}"),
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}
