//! Application state
//!
//! Holds the shared state for the Axum application: the gateway state (which
//! owns the service context and topic registry) and configuration.

use std::sync::Arc;

use weview_common::AppConfig;
use weview_gateway::GatewayState;
use weview_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Gateway state, shared with the mounted WebSocket route
    gateway: GatewayState,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(gateway: GatewayState, config: AppConfig) -> Self {
        Self {
            gateway,
            config: Arc::new(config),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        self.gateway.service_context()
    }

    /// Get the gateway state
    pub fn gateway(&self) -> &GatewayState {
        &self.gateway
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("gateway", &self.gateway)
            .field("config", &"AppConfig")
            .finish()
    }
}
