//! Presence poller.
//!
//! A background task samples a [`StatusSource`] on a fixed cadence and
//! publishes the resulting [`PresenceState`]:
//!
//! - the first poll runs immediately;
//! - later polls start every `interval`, measured from the previous start;
//! - a poll that overruns the interval delays the next one, polls never overlap;
//! - [`PollerHandle::stop`] cancels the loop, and a poll still in flight is
//!   dropped without touching the state.

use parking_lot::Mutex;
use presence_core::{PresenceState, DEFAULT_POLL_INTERVAL};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::source::StatusSource;

/// Shortest accepted interval; `tokio::time::interval` rejects zero
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// State shared between the poll task and its handle
#[derive(Debug)]
struct Shared {
    /// Guards publication so nothing is published once `stop` has returned
    stopped: Mutex<bool>,
    state_tx: watch::Sender<PresenceState>,
}

impl Shared {
    fn new() -> Self {
        let (state_tx, _) = watch::channel(PresenceState::Unknown);
        Self {
            stopped: Mutex::new(false),
            state_tx,
        }
    }

    /// Publish a new state. Returns `false` if the poller has been stopped.
    fn publish(&self, next: PresenceState) -> bool {
        let stopped = self.stopped.lock();
        if *stopped {
            return false;
        }

        // Subscribers are only woken on an actual change
        let changed = self.state_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        if changed {
            tracing::debug!(state = %next, "Presence state changed");
        }
        true
    }

    /// Mark as stopped. Returns `true` for the first call only.
    fn stop(&self) -> bool {
        let mut stopped = self.stopped.lock();
        !std::mem::replace(&mut *stopped, true)
    }

    fn is_stopped(&self) -> bool {
        *self.stopped.lock()
    }
}

/// Poller builder
pub struct PresencePoller {
    source: Arc<dyn StatusSource>,
    interval: Duration,
}

impl PresencePoller {
    /// Create a poller over `source` with the default interval
    pub fn new(source: impl StatusSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the time between poll starts (at least [`MIN_INTERVAL`])
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    /// Start polling in a background task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(self) -> PollerHandle {
        let shared = Arc::new(Shared::new());
        let token = CancellationToken::new();

        tracing::info!(interval_ms = self.interval.as_millis(), "Starting presence poller");

        let task = tokio::spawn(run_poll_loop(
            self.source,
            self.interval,
            Arc::clone(&shared),
            token.clone(),
        ));

        PollerHandle {
            shared,
            token,
            task: Mutex::new(Some(task)),
        }
    }
}

impl std::fmt::Debug for PresencePoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresencePoller")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

async fn run_poll_loop(
    source: Arc<dyn StatusSource>,
    interval: Duration,
    shared: Arc<Shared>,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut tick: u64 = 0;

    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        tick += 1;
        let result = tokio::select! {
            biased;
            () = token.cancelled() => break,
            result = source.fetch() => result,
        };

        match &result {
            Ok(count) => tracing::trace!(tick, count, "Poll succeeded"),
            Err(e) => tracing::debug!(tick, error = %e, "Poll failed"),
        }

        if !shared.publish(PresenceState::from_poll(&result)) {
            break;
        }
    }

    tracing::debug!(ticks = tick, "Presence poller stopped");
}

/// Handle to a running poller.
///
/// Dropping the handle stops the poller.
#[derive(Debug)]
pub struct PollerHandle {
    shared: Arc<Shared>,
    token: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PollerHandle {
    /// Latest presence state
    #[must_use]
    pub fn state(&self) -> PresenceState {
        *self.shared.state_tx.borrow()
    }

    /// Receiver notified whenever the state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PresenceState> {
        self.shared.state_tx.subscribe()
    }

    /// Stop polling. Immediate and idempotent.
    ///
    /// Once this returns the state no longer changes, even if a request that
    /// was in flight completes afterwards.
    pub fn stop(&self) {
        if self.shared.stop() {
            self.token.cancel();
            tracing::info!("Presence poller stop requested");
        }
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.shared.is_stopped()
    }

    /// Stop and wait for the background task to finish
    pub async fn shutdown(self) {
        self.stop();
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Presence poller task ended abnormally");
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
