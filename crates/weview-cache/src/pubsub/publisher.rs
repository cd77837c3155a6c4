//! Redis Pub/Sub publisher.
//!
//! Publishes relay events on a topic's bus channel. Every gateway instance
//! with a local subscriber on that topic receives the message and fans it
//! out to its own connections.

use async_trait::async_trait;
use weview_core::{EventPublisher, RelayEvent, RepoResult, Topic};

use crate::pool::{RedisPool, RedisPoolError, RedisResult};

/// Redis Pub/Sub publisher
#[derive(Clone, Debug)]
pub struct RedisPublisher {
    pool: RedisPool,
}

impl RedisPublisher {
    /// Create a new publisher
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish an event, returning the number of Redis connections that received it
    pub async fn publish_event(&self, topic: &Topic, event: &RelayEvent) -> RedisResult<usize> {
        let channel_name = topic.name();
        let payload = event.to_json().map_err(RedisPoolError::Serialization)?;

        let receivers = self.pool.publish(&channel_name, &payload).await?;

        tracing::debug!(
            channel = %channel_name,
            event = event.kind(),
            receivers = receivers,
            "Published event"
        );

        Ok(receivers)
    }
}

#[async_trait]
impl EventPublisher for RedisPublisher {
    async fn publish(&self, topic: &Topic, event: &RelayEvent) -> RepoResult<usize> {
        Ok(self.publish_event(topic, event).await?)
    }
}
