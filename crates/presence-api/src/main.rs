//! Presence API server entry point
//!
//! Run with:
//! ```bash
//! REDIS_URL=redis://127.0.0.1:6379 cargo run -p presence-api
//! ```
//!
//! Configuration is loaded from environment variables or a `.env` file.

use presence_common::{try_init_tracing_with_config, AppConfig, Environment, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Pick the log format before the full config is loaded so config errors are logged
    let env: Environment = std::env::var("APP_ENV")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();
    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Presence API Server...");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        app = %config.app.name,
        env = ?config.app.env,
        address = %config.api.address(),
        "Configuration loaded"
    );

    presence_api::run(config).await?;

    Ok(())
}
