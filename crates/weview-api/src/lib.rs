//! # weview-api
//!
//! REST API server built with Axum framework.
//!
//! Serves the session and friend endpoints and mounts the gateway's
//! WebSocket route, so a single process can run the whole system.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, run_server};
pub use state::AppState;
