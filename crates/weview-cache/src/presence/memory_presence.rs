//! In-process presence store.

use async_trait::async_trait;
use dashmap::DashSet;
use weview_core::{DomainError, PresenceStore, RepoResult, Username};

/// `DashSet`-backed presence store for single-instance deployments
#[derive(Debug, Default)]
pub struct MemoryPresenceStore {
    online: DashSet<Username>,
}

impl MemoryPresenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresenceStore for MemoryPresenceStore {
    async fn login(&self, username: &Username) -> RepoResult<()> {
        self.online.insert(username.clone());
        tracing::debug!(username = %username, "Set presence");
        Ok(())
    }

    async fn logout(&self, username: &Username) -> RepoResult<()> {
        match self.online.remove(username) {
            Some(_) => {
                tracing::debug!(username = %username, "Removed presence");
                Ok(())
            }
            None => Err(DomainError::UserNotLoggedIn(username.clone())),
        }
    }

    async fn is_logged_in(&self, username: &Username) -> RepoResult<bool> {
        Ok(self.online.contains(username))
    }
}
