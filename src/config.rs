//! Configuration types.
//!
//! # Environment Variables
//!
//! - `API_BASE_URL` - verification/store service (default: `http://localhost:8080`)
//! - `RECIENHECHO_HTTP_TIMEOUT_SECS` - per-request timeout (default: 15)
//! - `RECIENHECHO_RESEND_COOLDOWN_SECS` - seconds before a code can be resent (default: 24)

use std::time::Duration;

use crate::error::ConfigError;

/// Development address used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Seconds the user must wait before requesting a new code.
pub const DEFAULT_RESEND_COOLDOWN_SECS: u32 = 24;

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Client configuration, passed explicitly to every component that talks to
/// the service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the verification/store service, without trailing slash.
    pub base_url: String,
    /// Timeout applied to each HTTP request.
    pub request_timeout: Duration,
    /// Resend countdown length, in seconds.
    pub resend_cooldown: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            resend_cooldown: DEFAULT_RESEND_COOLDOWN_SECS,
        }
    }
}

impl ClientConfig {
    /// Build a config for the given base URL with default timeouts.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            ..Self::default()
        })
    }

    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("API_BASE_URL") {
            if !url.trim().is_empty() {
                config.base_url = normalize_base_url(&url)?;
            }
        }

        if let Ok(raw) = std::env::var("RECIENHECHO_HTTP_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "RECIENHECHO_HTTP_TIMEOUT_SECS".to_string(),
                message: format!("expected whole seconds, got {raw:?}"),
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Ok(raw) = std::env::var("RECIENHECHO_RESEND_COOLDOWN_SECS") {
            config.resend_cooldown = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "RECIENHECHO_RESEND_COOLDOWN_SECS".to_string(),
                message: format!("expected whole seconds, got {raw:?}"),
            })?;
        }

        Ok(config)
    }

    /// Join a path (starting with `/`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    reqwest::Url::parse(trimmed).map_err(|e| ConfigError::InvalidValue {
        key: "API_BASE_URL".to_string(),
        message: e.to_string(),
    })?;
    Ok(trimmed.to_string())
}
