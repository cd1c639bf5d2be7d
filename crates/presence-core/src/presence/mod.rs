//! Client-side presence state machine

mod state;

pub use state::{PollError, PresenceState};
