//! Presence watcher
//!
//! Polls the status endpoint and prints every presence change.
//!
//! Run with:
//! ```bash
//! PRESENCE_STATUS_URL=http://127.0.0.1:3000/api/status cargo run -p presence-client
//! ```

use anyhow::Context;
use presence_client::{HttpStatusSource, PollerConfig, PresencePoller};
use presence_common::{shutdown_signal, try_init_tracing};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Presence watcher failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = PollerConfig::from_env().context("Failed to load poller configuration")?;
    info!(
        url = %config.status_url,
        interval_ms = config.interval.as_millis(),
        "Watching presence"
    );

    let source = HttpStatusSource::new(&config.status_url, config.request_timeout)
        .context("Failed to build HTTP client")?;
    let handle = PresencePoller::new(source)
        .with_interval(config.interval)
        .spawn();

    let mut changes = handle.subscribe();
    println!("{}", *changes.borrow_and_update());

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", *changes.borrow_and_update());
            }
        }
    }

    handle.shutdown().await;
    info!("Presence watcher stopped");
    Ok(())
}
