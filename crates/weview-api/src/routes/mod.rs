//! Route definitions
//!
//! Session routes at the root and per-user routes under `/user/:username`.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, session, users};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(session_routes())
        .nest("/user/:username", user_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Session routes
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(session::login))
        .route("/logout", post(session::logout))
        .route("/signup", post(session::signup))
        .route("/guest", get(session::guest))
}

/// Per-user routes, nested under `/user/:username`
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user-data", get(users::user_data))
        .route("/friends", get(users::friends))
        .route("/make-friend/:other", post(users::make_friend))
        .route("/decline-friend/:other", post(users::decline_friend))
        .route("/friend-request/:other", post(users::friend_request))
        .route("/search-friend", get(users::search_friend))
        .route(
            "/friend-requests-notifications",
            get(users::friend_requests_notifications),
        )
}
