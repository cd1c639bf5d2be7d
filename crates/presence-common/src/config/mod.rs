//! Configuration structs

mod app_config;

pub use app_config::{
    env_parse, AppConfig, AppSettings, ConfigError, CorsConfig, Environment, RedisConfig,
    ServerConfig, StatusConfig,
};
