//! Where a poller gets its samples from.
//!
//! [`HttpStatusSource`] calls the status endpoint over HTTP. Tests and
//! embedders can supply their own [`StatusSource`].

use async_trait::async_trait;
use presence_core::{PollError, StatusResponse};
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ClientResult;

/// One sample of the status endpoint
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the current active count.
    ///
    /// `Err(PollError::Transport)` when the request did not complete,
    /// `Err(PollError::Endpoint)` when it completed with a failing status.
    async fn fetch(&self) -> Result<u64, PollError>;
}

#[async_trait]
impl<S: StatusSource + ?Sized> StatusSource for Arc<S> {
    async fn fetch(&self) -> Result<u64, PollError> {
        (**self).fetch().await
    }
}

/// Status source calling the endpoint over HTTP
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    client: Client,
    url: String,
}

impl HttpStatusSource {
    /// Create a source for `url` with a per-request timeout
    pub fn new(url: impl Into<String>, request_timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("presence-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, url))
    }

    /// Create a source reusing an existing client
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(&self) -> Result<u64, PollError> {
        // Always ask for a live read, whatever shared caches are allowed to do
        let response = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(PollError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Endpoint {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(PollError::transport)?;
        Ok(StatusResponse::count_from_body(&body))
    }
}
