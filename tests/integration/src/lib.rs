//! Integration test utilities for the presence counter
//!
//! This crate provides helpers for running end-to-end tests against the
//! status endpoint and the presence poller.

pub mod helpers;

pub use helpers::*;
