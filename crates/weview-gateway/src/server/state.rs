//! Gateway state
//!
//! Application state for the gateway server.

use std::sync::Arc;

use weview_service::ServiceContext;

use super::backends::Backends;
use crate::broadcast::RelayDispatcher;
use crate::registry::TopicRegistry;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Service context with stores and publisher
    service_context: Arc<ServiceContext>,
    /// Local topic subscribers
    registry: Arc<TopicRegistry>,
    /// Bus forwarder, present when events travel over Redis
    dispatcher: Option<Arc<RelayDispatcher>>,
    /// Connection pools behind the stores
    backends: Backends,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(
        service_context: Arc<ServiceContext>,
        registry: Arc<TopicRegistry>,
        dispatcher: Option<Arc<RelayDispatcher>>,
        backends: Backends,
    ) -> Self {
        Self {
            service_context,
            registry,
            dispatcher,
            backends,
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Shared handle on the service context
    pub fn shared_service_context(&self) -> Arc<ServiceContext> {
        Arc::clone(&self.service_context)
    }

    /// Get the topic registry
    pub fn registry(&self) -> &TopicRegistry {
        &self.registry
    }

    /// Get the relay dispatcher, if events travel over Redis
    pub fn dispatcher(&self) -> Option<&RelayDispatcher> {
        self.dispatcher.as_deref()
    }

    /// Get the backing connection pools
    pub fn backends(&self) -> &Backends {
        &self.backends
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("registry", &self.registry)
            .field("dispatcher", &self.dispatcher.is_some())
            .field("backends", &self.backends)
            .finish()
    }
}
