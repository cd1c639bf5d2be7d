//! # presence-client
//!
//! Client side of the live presence counter: a poller that samples the status
//! endpoint on a fixed interval and exposes the latest [`PresenceState`] to a
//! display.
//!
//! ## Example
//!
//! ```ignore
//! use presence_client::{HttpStatusSource, PollerConfig, PresencePoller};
//!
//! let config = PollerConfig::from_env()?;
//! let source = HttpStatusSource::new(&config.status_url, config.request_timeout)?;
//! let handle = PresencePoller::new(source).with_interval(config.interval).spawn();
//!
//! let mut changes = handle.subscribe();
//! while changes.changed().await.is_ok() {
//!     println!("{}", *changes.borrow_and_update());
//! }
//! ```

pub mod config;
pub mod error;
pub mod poller;
pub mod source;

pub use config::PollerConfig;
pub use error::{ClientError, ClientResult};
pub use poller::{PollerHandle, PresencePoller};
pub use presence_core::{PollError, PresenceState};
pub use source::{HttpStatusSource, StatusSource};
