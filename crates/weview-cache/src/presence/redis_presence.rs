//! User presence storage in Redis.
//!
//! A logged-in user has a `presence:{username}` key. Records have no TTL and
//! are only removed by an explicit logout.

use async_trait::async_trait;
use weview_core::{DomainError, PresenceStore, RepoResult, Username};

use crate::pool::RedisPool;

/// Key prefix for user presence
const PRESENCE_PREFIX: &str = "presence:";

/// Redis-backed presence store
#[derive(Clone, Debug)]
pub struct RedisPresenceStore {
    pool: RedisPool,
}

impl RedisPresenceStore {
    /// Create a new presence store
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Generate Redis key for user presence
    fn presence_key(username: &Username) -> String {
        format!("{PRESENCE_PREFIX}{username}")
    }
}

#[async_trait]
impl PresenceStore for RedisPresenceStore {
    async fn login(&self, username: &Username) -> RepoResult<()> {
        let key = Self::presence_key(username);
        let since = chrono::Utc::now().to_rfc3339();
        self.pool.set_str(&key, &since).await?;

        tracing::debug!(username = %username, "Set presence");
        Ok(())
    }

    async fn logout(&self, username: &Username) -> RepoResult<()> {
        let key = Self::presence_key(username);

        // DEL reports how many keys went away; zero means nobody was logged in
        if self.pool.delete(&key).await? {
            tracing::debug!(username = %username, "Removed presence");
            Ok(())
        } else {
            Err(DomainError::UserNotLoggedIn(username.clone()))
        }
    }

    async fn is_logged_in(&self, username: &Username) -> RepoResult<bool> {
        let key = Self::presence_key(username);
        Ok(self.pool.exists(&key).await?)
    }
}
