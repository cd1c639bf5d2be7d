//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub redis: RedisConfig,
    pub status: StatusConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            _ => Err(format!("unknown environment: {s}")),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on a whole request, enforced by middleware
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Redis (counter store) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
    /// Timeout for creating or waiting for a pooled connection
    #[serde(default = "default_redis_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Timeout for a single command attempt
    #[serde(default = "default_redis_timeout_ms")]
    pub command_timeout_ms: u64,
    /// Total attempts per read, including the first one
    #[serde(default = "default_redis_max_attempts")]
    pub max_attempts: u32,
}

impl RedisConfig {
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

/// Status endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StatusConfig {
    /// Freshness window advertised to shared caches
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u32,
    /// Window during which a stale copy may be served while revalidating
    #[serde(default = "default_stale_while_revalidate_secs")]
    pub stale_while_revalidate_secs: u32,
    /// Start without a counter store if the pool cannot be built
    #[serde(default)]
    pub allow_degraded_start: bool,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            max_age_secs: default_max_age_secs(),
            stale_while_revalidate_secs: default_stale_while_revalidate_secs(),
            allow_degraded_start: false,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "presence-counter".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_redis_max_connections() -> u32 {
    16
}

fn default_redis_timeout_ms() -> u64 {
    2000
}

fn default_redis_max_attempts() -> u32 {
    2
}

/// A read is tried at most twice: the first attempt plus one retry
const MAX_REDIS_ATTEMPTS: u32 = 2;

fn default_max_age_secs() -> u32 {
    5
}

fn default_stale_while_revalidate_secs() -> u32 {
    30
}

/// Parse an optional variable, falling back to `default` when it is unset.
///
/// A variable that is set but does not parse is an error rather than being
/// silently replaced by the default.
pub fn env_parse<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        None => Ok(default),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let redis_url = lookup("REDIS_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingVar("REDIS_URL"))?;

        let request_timeout_secs: u64 = env_parse(
            &lookup,
            "REQUEST_TIMEOUT_SECS",
            default_request_timeout_secs(),
        )?;
        if request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "REQUEST_TIMEOUT_SECS",
                request_timeout_secs.to_string(),
            ));
        }

        let max_attempts: u32 =
            env_parse(&lookup, "REDIS_MAX_ATTEMPTS", default_redis_max_attempts())?;
        if !(1..=MAX_REDIS_ATTEMPTS).contains(&max_attempts) {
            return Err(ConfigError::InvalidValue(
                "REDIS_MAX_ATTEMPTS",
                max_attempts.to_string(),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: env_parse(&lookup, "APP_ENV", Environment::default())?,
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port: env_parse(&lookup, "API_PORT", default_port())?,
                request_timeout_secs,
            },
            redis: RedisConfig {
                url: redis_url,
                max_connections: env_parse(
                    &lookup,
                    "REDIS_MAX_CONNECTIONS",
                    default_redis_max_connections(),
                )?,
                connect_timeout_ms: env_parse(
                    &lookup,
                    "REDIS_CONNECT_TIMEOUT_MS",
                    default_redis_timeout_ms(),
                )?,
                command_timeout_ms: env_parse(
                    &lookup,
                    "REDIS_COMMAND_TIMEOUT_MS",
                    default_redis_timeout_ms(),
                )?,
                max_attempts,
            },
            status: StatusConfig {
                max_age_secs: env_parse(&lookup, "STATUS_MAX_AGE_SECS", default_max_age_secs())?,
                stale_while_revalidate_secs: env_parse(
                    &lookup,
                    "STATUS_STALE_WHILE_REVALIDATE_SECS",
                    default_stale_while_revalidate_secs(),
                )?,
                allow_degraded_start: env_parse(&lookup, "STATUS_ALLOW_DEGRADED_START", false)?,
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|origin| !origin.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
