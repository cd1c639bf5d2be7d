//! # presence-api
//!
//! HTTP server exposing the live presence counter, built with Axum.

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, run_server};
pub use state::{AppState, StatusSettings};
