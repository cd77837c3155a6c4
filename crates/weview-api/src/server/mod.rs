//! Server setup and initialization
//!
//! Provides the main application builder and server runner. The REST routes
//! and the gateway's WebSocket route share one state, so events published
//! by a REST-side service reach sockets held by this process.

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;
use weview_common::{AppConfig, AppError};
use weview_gateway::{create_gateway_state, ws_routes};

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router().merge(health_routes());
    let router = apply_middleware(
        router,
        &state.config().cors,
        state.config().app.env.is_production(),
    );
    let gateway = state.gateway().clone();

    router
        .with_state(state)
        .merge(ws_routes().with_state(gateway))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!(
        storage = ?config.storage,
        presence = ?config.presence,
        "Assembling backends..."
    );
    let gateway = create_gateway_state(&config).await?;
    info!("Backends ready");

    Ok(AppState::new(gateway, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, address: &str) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", address);

    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {address}: {e}")))?;

    info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let address = config.api.address();
    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, &address).await
}
