//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers, making HTTP requests,
//! and pointing a presence poller at them.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use presence_api::{create_app, AppState, StatusSettings};
use presence_cache::SharedCounterStore;
use presence_client::HttpStatusSource;
use presence_common::AppConfig;
use presence_core::STATUS_PATH;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Start a test server backed by `store`
    pub async fn start(store: SharedCounterStore) -> Result<Self> {
        Self::start_with_config(Some(store), test_config(&[])?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(
        store: Option<SharedCounterStore>,
        config: AppConfig,
    ) -> Result<Self> {
        let state = AppState::new(store, StatusSettings::from_config(&config));
        let app = create_app(state, &config);

        // Bind to an ephemeral port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Full URL of the status endpoint
    pub fn status_url(&self) -> String {
        format!("{}{}", self.base_url(), STATUS_PATH)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Status source for this server.
    ///
    /// Connections are not pooled, so every poll opens a fresh one and sees
    /// the server going away.
    pub fn status_source(&self) -> Result<HttpStatusSource> {
        let client = Client::builder()
            .timeout(Duration::from_secs(2))
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(HttpStatusSource::with_client(client, self.status_url()))
    }

    /// Stop the server and wait until the listener is closed
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Create a test configuration.
///
/// `REDIS_URL` defaults to an unreachable address, `extra` entries override
/// any variable.
pub fn test_config(extra: &[(&str, &str)]) -> Result<AppConfig> {
    let mut vars: Vec<(String, String)> = extra
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    vars.push(("REDIS_URL".to_string(), "redis://127.0.0.1:1".to_string()));

    AppConfig::from_lookup(move |name| {
        vars.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    })
    .map_err(|e| anyhow::anyhow!("Config error: {}", e))
}

/// Redis URL for tests that need a live server, if one is configured
pub fn check_redis_env() -> Option<String> {
    dotenvy::dotenv().ok();

    match std::env::var("REDIS_URL") {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("Skipping test: REDIS_URL not set");
            None
        }
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
