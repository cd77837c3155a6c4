//! Relay dispatcher
//!
//! Receives relay events from Redis Pub/Sub and hands them to the local
//! subscribers of the matching topic. Only topics with at least one local
//! subscriber are subscribed on Redis.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use weview_cache::{ReceivedMessage, Subscriber, SubscriberConfig, SubscriberError};
use weview_core::Topic;

use crate::registry::TopicRegistry;

/// Configuration for the relay dispatcher
#[derive(Debug, Clone)]
pub struct RelayDispatcherConfig {
    /// Redis URL
    pub redis_url: String,
    /// Broadcast buffer size
    pub broadcast_buffer: usize,
    /// Reconnection delay in milliseconds
    pub reconnect_delay_ms: u64,
}

impl Default for RelayDispatcherConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            broadcast_buffer: 1024,
            reconnect_delay_ms: 1000,
        }
    }
}

impl RelayDispatcherConfig {
    /// Dispatcher config for the given Redis URL
    #[must_use]
    pub fn new(redis_url: impl Into<String>) -> Self {
        Self {
            redis_url: redis_url.into(),
            ..Self::default()
        }
    }
}

/// Routes Redis Pub/Sub messages to the local topic registry
pub struct RelayDispatcher {
    registry: Arc<TopicRegistry>,
    subscriber: Subscriber,
    running: Arc<AtomicBool>,
}

impl RelayDispatcher {
    /// Create a new dispatcher; call [`RelayDispatcher::start`] to begin forwarding
    #[must_use]
    pub fn new(config: RelayDispatcherConfig, registry: Arc<TopicRegistry>) -> Self {
        let subscriber = Subscriber::new(SubscriberConfig {
            redis_url: config.redis_url,
            broadcast_buffer: config.broadcast_buffer,
            reconnect_delay_ms: config.reconnect_delay_ms,
        });

        Self {
            registry,
            subscriber,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start receiving events for `topic` from the bus
    pub async fn watch(&self, topic: &Topic) -> Result<(), SubscriberError> {
        self.subscriber.subscribe(std::slice::from_ref(topic)).await
    }

    /// Stop receiving events for `topic`
    pub async fn unwatch(&self, topic: &Topic) -> Result<(), SubscriberError> {
        self.subscriber.unsubscribe(std::slice::from_ref(topic)).await
    }

    /// Start the dispatcher loop in a background task
    pub fn start(self: Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("Relay dispatcher is already running");
            return;
        }

        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.run().await;
        });

        tracing::info!("Relay dispatcher started");
    }

    /// Stop the dispatcher
    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.subscriber.shutdown().await.ok();
        tracing::info!("Relay dispatcher stopped");
    }

    /// Check if the dispatcher is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn run(&self) {
        let mut receiver = self.subscriber.receiver();

        while self.running.load(Ordering::SeqCst) {
            match receiver.recv().await {
                Ok(msg) => {
                    self.handle_message(&msg);
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "Relay dispatcher lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::warn!("Relay dispatcher channel closed");
                    break;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        tracing::info!("Relay dispatcher loop ended");
    }

    /// Forward one bus message, returns the number of local deliveries
    fn handle_message(&self, msg: &ReceivedMessage) -> usize {
        let Some(topic) = &msg.topic else {
            tracing::debug!("Received message on a foreign channel, ignoring");
            return 0;
        };

        let delivered = self.registry.publish_local(topic, &msg.payload);
        tracing::trace!(topic = %topic, delivered, "Relay event dispatched");
        delivered
    }
}

impl Drop for RelayDispatcher {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
