//! Server setup and initialization
//!
//! Provides the application builder and server runner.

use std::net::SocketAddr;

use axum::Router;
use presence_cache::{RedisCounterStore, RedisPool, RedisPoolConfig, SharedCounterStore};
use presence_common::{shutdown_signal, AppConfig, AppError};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::{AppState, StatusSettings};

/// Build the complete Axum application with all routes and middleware
///
/// The status route is not rate limited, so every request gets the
/// `{"active": n}` shape.
pub fn create_app(state: AppState, config: &AppConfig) -> Router {
    let request_timeout = config.api.request_timeout();

    let api = apply_middleware_with_config(
        create_router(),
        request_timeout,
        &config.cors,
        config.app.env.is_production(),
    );
    let health = apply_middleware(health_routes(), request_timeout);

    api.merge(health).with_state(state)
}

/// Build the counter store and create AppState.
///
/// The Redis pool is constructed exactly once here and shared by every
/// request. When the pool cannot be built the server refuses to start, unless
/// degraded start is enabled, in which case the status endpoint reports
/// failures until the process is restarted with a working configuration.
pub async fn create_app_state(config: &AppConfig) -> Result<AppState, AppError> {
    info!("Creating Redis pool...");
    let counter_store: Option<SharedCounterStore> =
        match RedisPool::new(RedisPoolConfig::from(&config.redis)) {
            Ok(pool) => Some(
                RedisCounterStore::new(pool)
                    .with_max_attempts(config.redis.max_attempts)
                    .shared(),
            ),
            Err(e) if config.status.allow_degraded_start => {
                error!(error = %e, "Failed to create Redis pool; starting without a counter store");
                None
            }
            Err(e) => return Err(AppError::Cache(e.to_string())),
        };

    if counter_store.is_none() {
        warn!("Status endpoint will report failures until the counter store is configured");
    }

    Ok(AppState::new(
        counter_store,
        StatusSettings::from_config(config),
    ))
}

/// Run the HTTP server until a shutdown signal arrives
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Server(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let address = config.api.address();
    let addr = tokio::net::lookup_host(address.as_str())
        .await
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| AppError::Config(format!("Invalid API address: {address}")))?;

    let state = create_app_state(&config).await?;
    let app = create_app(state, &config);

    run_server(app, addr).await
}
