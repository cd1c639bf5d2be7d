//! Client error types
//!
//! Only set-up can fail. Once a poller runs, every failure becomes a
//! presence state instead of an error.

use presence_common::ConfigError;

/// Error type for setting up a poller
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for client set-up
pub type ClientResult<T> = Result<T, ClientError>;
