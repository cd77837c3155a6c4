//! Friend service - the request / accept / decline state machine
//!
//! Friendship is stored as two directed edges. Accept writes both edges, each
//! as an idempotent retried write, before removing the pending request, so a
//! failure part way through can be healed by repeating the accept.

use tracing::{info, instrument, warn};
use weview_core::{DomainError, FriendRequestNotification, User};

use crate::dto::UserSummary;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::session::SessionService;

/// Friend graph service
pub struct FriendService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FriendService<'a> {
    /// Create a new FriendService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn sessions(&self) -> SessionService<'a> {
        SessionService::new(self.ctx)
    }

    /// Both users must exist and differ
    async fn pair(&self, first: &str, second: &str, action: &str) -> ServiceResult<(User, User)> {
        let sessions = self.sessions();
        let first = sessions.find_user(first).await?;
        let second = sessions.find_user(second).await?;

        if first.username == second.username {
            return Err(ServiceError::invalid_operation(format!(
                "{} cannot {action} themselves",
                first.username
            )));
        }

        Ok((first, second))
    }

    /// Leave a friend request on `target` from `requester`
    ///
    /// Repeating the request replaces the earlier notification.
    #[instrument(skip(self))]
    pub async fn request_friend(&self, requester: &str, target: &str) -> ServiceResult<()> {
        let (requester, target) = self.pair(requester, target, "befriend").await?;
        let notification = FriendRequestNotification::new(&requester.username);

        let graph = self.ctx.friend_graph();
        self.ctx
            .retry_policy()
            .run("upsert_request", || {
                graph.upsert_request(&target.username, &notification)
            })
            .await?;

        info!("Friend request stored");
        Ok(())
    }

    /// `target` accepts `requester`
    ///
    /// A missing pending request does not block the accept.
    #[instrument(skip(self))]
    pub async fn accept_friend(&self, requester: &str, target: &str) -> ServiceResult<()> {
        let (requester, target) = self.pair(requester, target, "befriend").await?;
        let graph = self.ctx.friend_graph();
        let retry = self.ctx.retry_policy();

        retry
            .run("add_friend", || {
                graph.add_friend(&requester.username, &target.username)
            })
            .await?;
        retry
            .run("add_friend", || {
                graph.add_friend(&target.username, &requester.username)
            })
            .await?;
        let had_request = retry
            .run("remove_request", || {
                graph.remove_request(&target.username, &requester.username)
            })
            .await?;

        if !had_request {
            warn!("Friendship accepted without a pending request");
        }
        info!("Friendship established");
        Ok(())
    }

    /// `target` declines `requester`; absent requests are a no-op
    #[instrument(skip(self))]
    pub async fn decline_friend(&self, requester: &str, target: &str) -> ServiceResult<()> {
        let sessions = self.sessions();
        let requester = sessions.find_user(requester).await?;
        let target = sessions.find_user(target).await?;

        let graph = self.ctx.friend_graph();
        let removed = self
            .ctx
            .retry_policy()
            .run("remove_request", || {
                graph.remove_request(&target.username, &requester.username)
            })
            .await?;

        info!(removed, "Friend request declined");
        Ok(())
    }

    /// Friends of a logged-in user with their presence
    #[instrument(skip(self))]
    pub async fn list_friends(&self, username: &str) -> ServiceResult<Vec<UserSummary>> {
        let user = self.sessions().logged_in_user(username).await?;
        let names = self.ctx.friend_graph().friends(&user.username).await?;

        let mut friends = Vec::with_capacity(names.len());
        for name in names {
            let Some(friend) = self.ctx.user_repo().find_by_username(&name).await? else {
                warn!(friend = %name, "Friend edge points at a missing user");
                continue;
            };
            let online = self.ctx.presence_store().is_logged_in(&name).await?;
            friends.push(UserSummary::with_status(&friend, online));
        }

        Ok(friends)
    }

    /// Pending requests addressed to a logged-in user, oldest first
    #[instrument(skip(self))]
    pub async fn list_pending_requests(
        &self,
        username: &str,
    ) -> ServiceResult<Vec<FriendRequestNotification>> {
        let user = self.sessions().logged_in_user(username).await?;
        Ok(self.ctx.friend_graph().pending_requests(&user.username).await?)
    }

    /// Find a user by exact username, falling back to email
    #[instrument(skip(self))]
    pub async fn search_user(&self, query: &str) -> ServiceResult<UserSummary> {
        let query = query.trim();

        match self.sessions().find_user(query).await {
            Ok(user) => return Ok(UserSummary::public(&user)),
            Err(e) if e.as_domain().is_some_and(DomainError::is_not_found) => {}
            Err(e) => return Err(e),
        }

        self.ctx
            .user_repo()
            .find_by_email(query)
            .await?
            .map(|user| UserSummary::public(&user))
            .ok_or_else(|| ServiceError::user_not_found(query))
    }
}
