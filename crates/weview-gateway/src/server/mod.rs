//! Gateway server setup
//!
//! Provides the WebSocket routes, state assembly and the server runner.

mod backends;
mod handler;
mod state;

pub use backends::Backends;
pub use handler::ws_handler;
pub use state::GatewayState;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use weview_common::{AppConfig, AppError, PresenceBackend};

use crate::broadcast::{RelayDispatcher, RelayDispatcherConfig};
use crate::registry::TopicRegistry;

/// WebSocket routes only, for mounting into another router
pub fn ws_routes() -> Router<GatewayState> {
    Router::new().route("/ws/:username", get(ws_handler))
}

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    ws_routes().route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize all dependencies and create `GatewayState`
pub async fn create_gateway_state(config: &AppConfig) -> Result<GatewayState, AppError> {
    let registry = Arc::new(TopicRegistry::new(config.social.relay_buffer_size));

    let (builder, backends) = backends::assemble(config, &registry).await?;
    let service_context = builder
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let dispatcher = match (config.presence, &config.redis) {
        (PresenceBackend::Redis, Some(redis)) => {
            let dispatcher = Arc::new(RelayDispatcher::new(
                RelayDispatcherConfig::new(redis.url.clone()),
                registry.clone(),
            ));
            dispatcher.clone().start();
            Some(dispatcher)
        }
        _ => None,
    };

    Ok(GatewayState::new(
        Arc::new(service_context),
        registry,
        dispatcher,
        backends,
    ))
}

/// Run the gateway server
pub async fn run_server(app: Router, address: &str) -> Result<(), AppError> {
    tracing::info!("Starting Gateway server on {}", address);

    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {address}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/ws/{{username}}", address);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let state = create_gateway_state(&config).await?;
    let app = create_app(state);

    run_server(app, &config.gateway.address()).await
}
