//! Presence state as seen by a client polling the status endpoint.
//!
//! Every poll outcome maps to exactly one state:
//!
//! | Outcome                           | State        |
//! |-----------------------------------|--------------|
//! | request succeeded with a count    | `Online(n)`  |
//! | request completed with non-2xx    | `Offline`    |
//! | request did not complete          | `Unknown`    |
//!
//! Before the first poll completes the state is `Unknown`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure of a single poll
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollError {
    /// The request did not complete (connect error, timeout, body read error)
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The request completed but the endpoint answered with a failing status
    #[error("Endpoint returned status {status}")]
    Endpoint { status: u16 },
}

impl PollError {
    #[must_use]
    pub fn transport(err: impl fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Latest belief about the status endpoint and the count it reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "count", rename_all = "lowercase")]
pub enum PresenceState {
    /// Endpoint reachable, reported this many active participants
    Online(u64),
    /// Endpoint reachable but failing
    Offline,
    /// Endpoint unreachable, or nothing polled yet
    #[default]
    Unknown,
}

impl PresenceState {
    /// Transition for one completed poll
    #[must_use]
    pub fn from_poll(result: &Result<u64, PollError>) -> Self {
        match result {
            Ok(count) => Self::Online(*count),
            Err(PollError::Endpoint { .. }) => Self::Offline,
            Err(PollError::Transport(_)) => Self::Unknown,
        }
    }

    /// Active count, only known while online
    #[must_use]
    pub fn count(&self) -> Option<u64> {
        match self {
            Self::Online(n) => Some(*n),
            Self::Offline | Self::Unknown => None,
        }
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online(_))
    }
}

impl fmt::Display for PresenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online(n) => write!(f, "Online: {}", group_thousands(*n)),
            Self::Offline => write!(f, "Offline"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Format a count with comma thousands separators (1234567 -> "1,234,567")
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
