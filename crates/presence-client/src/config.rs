//! Poller configuration

use presence_common::{env_parse, ConfigError};
use presence_core::{DEFAULT_POLL_INTERVAL, DEFAULT_REQUEST_TIMEOUT, STATUS_PATH};
use std::time::Duration;

/// Poller configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Full URL of the status endpoint
    pub status_url: String,
    /// Time between poll starts
    pub interval: Duration,
    /// Upper bound on a single request
    pub request_timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            status_url: format!("http://127.0.0.1:3000{STATUS_PATH}"),
            interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl PollerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Intervals shorter than the endpoint's freshness window are raised to
    /// it: polling faster only returns cached copies.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let status_url = lookup("PRESENCE_STATUS_URL").unwrap_or(defaults.status_url);
        if reqwest::Url::parse(&status_url).is_err() {
            return Err(ConfigError::InvalidValue("PRESENCE_STATUS_URL", status_url));
        }

        let interval_ms: u64 = env_parse(
            &lookup,
            "PRESENCE_POLL_INTERVAL_MS",
            defaults.interval.as_millis() as u64,
        )?;
        let mut interval = Duration::from_millis(interval_ms);
        if interval < DEFAULT_POLL_INTERVAL {
            tracing::warn!(
                requested_ms = interval_ms,
                minimum_ms = DEFAULT_POLL_INTERVAL.as_millis(),
                "Poll interval below the status freshness window, raising it"
            );
            interval = DEFAULT_POLL_INTERVAL;
        }

        let timeout_ms: u64 = env_parse(
            &lookup,
            "PRESENCE_REQUEST_TIMEOUT_MS",
            defaults.request_timeout.as_millis() as u64,
        )?;
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "PRESENCE_REQUEST_TIMEOUT_MS",
                timeout_ms.to_string(),
            ));
        }

        Ok(Self {
            status_url,
            interval,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }
}
