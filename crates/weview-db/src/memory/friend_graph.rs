//! In-memory implementation of FriendGraphStore

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use dashmap::DashMap;

use weview_core::entities::FriendRequestNotification;
use weview_core::traits::{FriendGraphStore, RepoResult};
use weview_core::value_objects::Username;

/// In-memory friend graph
///
/// Each mutation goes through a single `DashMap` entry, holding only that
/// user's shard lock.
#[derive(Debug, Default)]
pub struct MemoryFriendGraphStore {
    friends: DashMap<Username, BTreeSet<Username>>,
    requests: DashMap<Username, BTreeMap<Username, FriendRequestNotification>>,
}

impl MemoryFriendGraphStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FriendGraphStore for MemoryFriendGraphStore {
    async fn upsert_request(
        &self,
        target: &Username,
        request: &FriendRequestNotification,
    ) -> RepoResult<()> {
        self.requests
            .entry(target.clone())
            .or_default()
            .insert(request.requester_username.clone(), request.clone());
        Ok(())
    }

    async fn remove_request(&self, target: &Username, requester: &Username) -> RepoResult<bool> {
        Ok(self
            .requests
            .get_mut(target)
            .is_some_and(|mut pending| pending.remove(requester).is_some()))
    }

    async fn add_friend(&self, owner: &Username, friend: &Username) -> RepoResult<()> {
        self.friends
            .entry(owner.clone())
            .or_default()
            .insert(friend.clone());
        Ok(())
    }

    async fn friends(&self, owner: &Username) -> RepoResult<BTreeSet<Username>> {
        Ok(self
            .friends
            .get(owner)
            .map(|set| set.value().clone())
            .unwrap_or_default())
    }

    async fn pending_requests(
        &self,
        target: &Username,
    ) -> RepoResult<Vec<FriendRequestNotification>> {
        let mut pending: Vec<_> = self
            .requests
            .get(target)
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default();
        pending.sort_by_key(|n| n.created_at);
        Ok(pending)
    }
}
