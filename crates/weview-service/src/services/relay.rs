//! Relay service - client-triggered presence and watch-invite events
//!
//! Each operation publishes one event to the target user's topic. Delivery is
//! best effort: nobody listening is not an error.

use tracing::{debug, instrument};
use weview_core::{DomainError, RelayEvent, Topic, Username};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Relay service
pub struct RelayService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RelayService<'a> {
    /// Create a new RelayService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Tell `target` that `friend` came online
    #[instrument(skip(self))]
    pub async fn publish_login(&self, friend: &str, target: &str) -> ServiceResult<usize> {
        let username = parse(friend)?;
        self.publish(target, RelayEvent::Login { username }).await
    }

    /// Tell `target` that `friend` went offline
    #[instrument(skip(self))]
    pub async fn publish_logout(&self, friend: &str, target: &str) -> ServiceResult<usize> {
        let username = parse(friend)?;
        self.publish(target, RelayEvent::Logout { username }).await
    }

    /// Invite `target` to watch with `inviter`
    #[instrument(skip(self))]
    pub async fn publish_invite(&self, inviter: &str, target: &str) -> ServiceResult<usize> {
        let username = parse(inviter)?;
        self.publish(target, RelayEvent::Invite { username }).await
    }

    /// Tell `target` that `accepter` took the watch invite
    #[instrument(skip(self))]
    pub async fn publish_accept_invite(&self, accepter: &str, target: &str) -> ServiceResult<usize> {
        let username = parse(accepter)?;
        self.publish(target, RelayEvent::AcceptInvite { username })
            .await
    }

    async fn publish(&self, target: &str, event: RelayEvent) -> ServiceResult<usize> {
        let topic = Topic::user(&parse(target)?);
        let delivered = self.ctx.publisher().publish(&topic, &event).await?;

        debug!(topic = %topic, event = event.kind(), delivered, "Relay event published");
        Ok(delivered)
    }
}

fn parse(raw: &str) -> Result<Username, DomainError> {
    Username::parse(raw).map_err(|e| DomainError::InvalidUsername(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::TestHarness;

    #[tokio::test]
    async fn test_publish_with_no_subscribers() {
        let harness = TestHarness::new();
        let relay = RelayService::new(&harness.ctx);

        let delivered = relay.publish_login("bob", "alice").await.unwrap();

        assert_eq!(delivered, 0);
        assert_eq!(harness.publisher.published().len(), 1);
    }

    #[tokio::test]
    async fn test_events_target_the_recipient_topic() {
        let harness = TestHarness::new();
        harness.publisher.set_subscribers(2);
        let relay = RelayService::new(&harness.ctx);

        assert_eq!(relay.publish_invite("alice", "bob").await.unwrap(), 2);
        relay.publish_accept_invite("bob", "alice").await.unwrap();
        relay.publish_logout("bob", "alice").await.unwrap();

        let published = harness.publisher.published();
        let summary: Vec<_> = published
            .iter()
            .map(|(topic, event)| (topic.as_str(), event.kind(), event.username().as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("/topic/user/bob", "invite", "alice"),
                ("/topic/user/alice", "acceptInvite", "bob"),
                ("/topic/user/alice", "logout", "bob"),
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_target_rejected() {
        let harness = TestHarness::new();
        let relay = RelayService::new(&harness.ctx);

        let err = relay.publish_invite("alice", "").await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::InvalidUsername(_))));
        assert!(harness.publisher.published().is_empty());
    }
}
