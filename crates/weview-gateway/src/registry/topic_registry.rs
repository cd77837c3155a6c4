//! Topic registry
//!
//! Maps each topic to the bounded queues of the connections subscribed to it,
//! using `DashMap` so publishing to one topic never blocks another.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc::{self, error::TrySendError};
use weview_core::traits::{EventPublisher, RepoResult};
use weview_core::{DomainError, RelayEvent, Topic};

/// Identifies one subscription within the registry
pub type SubscriberId = u64;

struct LocalSubscriber {
    id: SubscriberId,
    sender: mpsc::Sender<String>,
}

/// A connection's registration on a topic
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriberId,
    pub topic: Topic,
    /// Payloads published to the topic after the subscription was made
    pub receiver: mpsc::Receiver<String>,
    /// Whether this is the only local subscriber on the topic
    pub first_on_topic: bool,
}

/// Registry of local subscribers keyed by topic name
pub struct TopicRegistry {
    topics: DashMap<String, Vec<LocalSubscriber>>,
    next_id: AtomicU64,
    buffer_size: usize,
}

impl TopicRegistry {
    /// `buffer_size` bounds each subscriber's queue
    #[must_use]
    pub fn new(buffer_size: usize) -> Self {
        Self {
            topics: DashMap::new(),
            next_id: AtomicU64::new(1),
            buffer_size: buffer_size.max(1),
        }
    }

    /// Register a new subscriber on `topic`
    pub fn subscribe(&self, topic: &Topic) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel(self.buffer_size);

        let mut subscribers = self.topics.entry(topic.name()).or_default();
        subscribers.push(LocalSubscriber { id, sender });
        let first_on_topic = subscribers.len() == 1;
        drop(subscribers);

        tracing::debug!(topic = %topic, subscriber_id = id, "Subscribed to topic");

        Subscription {
            id,
            topic: topic.clone(),
            receiver,
            first_on_topic,
        }
    }

    /// Remove a subscriber, returns whether the topic has no subscribers left
    pub fn unsubscribe(&self, topic: &Topic, id: SubscriberId) -> bool {
        let name = topic.name();

        if let Some(mut subscribers) = self.topics.get_mut(&name) {
            subscribers.retain(|s| s.id != id);
        }
        let emptied = self.topics.remove_if(&name, |_, s| s.is_empty()).is_some();

        tracing::debug!(topic = %topic, subscriber_id = id, emptied, "Unsubscribed from topic");
        emptied
    }

    /// Hand `payload` to every current subscriber of `topic`
    ///
    /// Full queues drop the payload for that subscriber only; closed queues
    /// are pruned. Returns the number of subscribers that accepted it.
    pub fn publish_local(&self, topic: &Topic, payload: &str) -> usize {
        let name = topic.name();

        // no map lock is held while sending
        let senders: Vec<(SubscriberId, mpsc::Sender<String>)> = match self.topics.get(&name) {
            Some(subscribers) => subscribers
                .iter()
                .map(|s| (s.id, s.sender.clone()))
                .collect(),
            None => return 0,
        };

        let mut delivered = 0;
        let mut closed = Vec::new();
        for (id, sender) in senders {
            match sender.try_send(payload.to_string()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(topic = %topic, subscriber_id = id, "Subscriber queue full, event dropped");
                }
                Err(TrySendError::Closed(_)) => closed.push(id),
            }
        }

        if !closed.is_empty() {
            if let Some(mut subscribers) = self.topics.get_mut(&name) {
                subscribers.retain(|s| !closed.contains(&s.id));
            }
            self.topics.remove_if(&name, |_, s| s.is_empty());
            tracing::debug!(topic = %topic, pruned = closed.len(), "Pruned closed subscribers");
        }

        delivered
    }

    /// Number of subscribers currently on `topic`
    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.topics.get(&topic.name()).map_or(0, |s| s.len())
    }

    /// Number of topics with at least one subscriber
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

impl std::fmt::Debug for TopicRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicRegistry")
            .field("topics", &self.topics.len())
            .field("buffer_size", &self.buffer_size)
            .finish()
    }
}

#[async_trait]
impl EventPublisher for TopicRegistry {
    async fn publish(&self, topic: &Topic, event: &RelayEvent) -> RepoResult<usize> {
        let payload = event
            .to_json()
            .map_err(|e| DomainError::InternalError(format!("Failed to encode relay event: {e}")))?;
        Ok(self.publish_local(topic, &payload))
    }
}
