//! # presence-common
//!
//! Shared utilities including configuration, error handling, and telemetry.

pub mod config;
pub mod error;
pub mod signal;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    env_parse, AppConfig, AppSettings, ConfigError, CorsConfig, Environment, RedisConfig,
    ServerConfig, StatusConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use signal::shutdown_signal;
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
