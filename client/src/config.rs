//! Client configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Base URLs and retry tuning live in one `ClientConfig` value that is handed
//! to `ApiClient` and `ChatSocket` at construction. Nothing reads the
//! environment after that point.

use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_WS_BASE_URL: &str = "ws://localhost:8080/ws";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RECONNECT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_RECONNECT_INTERVAL_MS: u64 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name}: {url} (expected {expected})")]
    InvalidUrl { name: &'static str, url: String, expected: &'static str },
}

/// Bounded linear retry: a fixed number of attempts separated by a fixed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RECONNECT_MAX_ATTEMPTS,
            interval: Duration::from_millis(DEFAULT_RECONNECT_INTERVAL_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub ws_base_url: String,
    pub request_timeout: Duration,
    pub reconnect: ReconnectPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            ws_base_url: DEFAULT_WS_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CHAT_API_URL`: REST base URL, default `http://localhost:8080/api`
    /// - `CHAT_WS_URL`: streaming base URL, default `ws://localhost:8080/ws`
    /// - `CHAT_REQUEST_TIMEOUT_SECS`: default 30
    /// - `CHAT_RECONNECT_MAX_ATTEMPTS`: default 5
    /// - `CHAT_RECONNECT_INTERVAL_MS`: default 3000
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if a base URL has the wrong scheme.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = std::env::var("CHAT_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned());
        let ws_base_url = std::env::var("CHAT_WS_URL").unwrap_or_else(|_| DEFAULT_WS_BASE_URL.to_owned());

        Self::with_urls(&api_base_url, &ws_base_url).map(|config| Self {
            request_timeout: Duration::from_secs(env_parse("CHAT_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)),
            reconnect: ReconnectPolicy {
                max_attempts: env_parse("CHAT_RECONNECT_MAX_ATTEMPTS", DEFAULT_RECONNECT_MAX_ATTEMPTS),
                interval: Duration::from_millis(env_parse(
                    "CHAT_RECONNECT_INTERVAL_MS",
                    DEFAULT_RECONNECT_INTERVAL_MS,
                )),
            },
            ..config
        })
    }

    /// Default config pointed at the given base URLs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if a base URL has the wrong scheme.
    pub fn with_urls(api_base_url: &str, ws_base_url: &str) -> Result<Self, ConfigError> {
        let api_base_url = validate_url("CHAT_API_URL", api_base_url, &["http://", "https://"], "http:// or https://")?;
        let ws_base_url = validate_url("CHAT_WS_URL", ws_base_url, &["ws://", "wss://"], "ws:// or wss://")?;
        Ok(Self { api_base_url, ws_base_url, ..Self::default() })
    }
}

fn validate_url(
    name: &'static str,
    raw: &str,
    schemes: &[&str],
    expected: &'static str,
) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if schemes.iter().any(|scheme| trimmed.starts_with(scheme) && trimmed.len() > scheme.len()) {
        Ok(trimmed.to_owned())
    } else {
        Err(ConfigError::InvalidUrl { name, url: raw.to_owned(), expected })
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
