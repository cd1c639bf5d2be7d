//! Status endpoint payload

mod response;

pub use response::{StatusResponse, STATUS_PATH};
