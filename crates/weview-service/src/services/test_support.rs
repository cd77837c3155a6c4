//! Shared fixtures for service tests

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use weview_core::traits::{EventPublisher, FriendGraphStore, RepoResult, UserRepository};
use weview_core::{DomainError, FriendRequestNotification, RelayEvent, Topic, User, Username};
use weview_db::MemoryFriendGraphStore;

use super::context::ServiceContextBuilder;
use super::{RetryPolicy, ServiceContext, SessionService};
use crate::dto::SignupRequest;

/// Publisher that records every event and reports a fixed subscriber count
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<(String, RelayEvent)>>,
    subscribers: AtomicUsize,
}

impl RecordingPublisher {
    pub fn set_subscribers(&self, count: usize) {
        self.subscribers.store(count, Ordering::SeqCst);
    }

    /// `(destination, event)` pairs in publish order
    pub fn published(&self) -> Vec<(String, RelayEvent)> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, topic: &Topic, event: &RelayEvent) -> RepoResult<usize> {
        self.events
            .lock()
            .unwrap()
            .push((topic.destination(), event.clone()));
        Ok(self.subscribers.load(Ordering::SeqCst))
    }
}

/// Friend graph whose first `n` writes fail with a store error
pub struct FlakyFriendGraph {
    inner: MemoryFriendGraphStore,
    failures_left: AtomicU32,
}

impl FlakyFriendGraph {
    pub fn failing(n: u32) -> Self {
        Self {
            inner: MemoryFriendGraphStore::new(),
            failures_left: AtomicU32::new(n),
        }
    }

    pub fn failures_left(&self) -> u32 {
        self.failures_left.load(Ordering::SeqCst)
    }

    fn maybe_fail(&self) -> RepoResult<()> {
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            Err(DomainError::StoreError("connection reset".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FriendGraphStore for FlakyFriendGraph {
    async fn upsert_request(
        &self,
        target: &Username,
        request: &FriendRequestNotification,
    ) -> RepoResult<()> {
        self.maybe_fail()?;
        self.inner.upsert_request(target, request).await
    }

    async fn remove_request(&self, target: &Username, requester: &Username) -> RepoResult<bool> {
        self.maybe_fail()?;
        self.inner.remove_request(target, requester).await
    }

    async fn add_friend(&self, owner: &Username, friend: &Username) -> RepoResult<()> {
        self.maybe_fail()?;
        self.inner.add_friend(owner, friend).await
    }

    async fn friends(&self, owner: &Username) -> RepoResult<BTreeSet<Username>> {
        self.inner.friends(owner).await
    }

    async fn pending_requests(
        &self,
        target: &Username,
    ) -> RepoResult<Vec<FriendRequestNotification>> {
        self.inner.pending_requests(target).await
    }
}

/// User repository whose store is unreachable
pub struct UnreachableUserRepository;

#[async_trait]
impl UserRepository for UnreachableUserRepository {
    async fn find_by_username(&self, _username: &Username) -> RepoResult<Option<User>> {
        Err(DomainError::StoreError("db down".to_string()))
    }

    async fn find_by_email(&self, _email: &str) -> RepoResult<Option<User>> {
        Err(DomainError::StoreError("db down".to_string()))
    }

    async fn create(&self, _user: &User) -> RepoResult<()> {
        Err(DomainError::StoreError("db down".to_string()))
    }
}

/// In-memory context plus a handle on its publisher
pub struct TestHarness {
    pub ctx: ServiceContext,
    pub publisher: Arc<RecordingPublisher>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::build(|builder| builder)
    }

    pub fn with_graph(graph: Arc<dyn FriendGraphStore>) -> Self {
        Self::build(|builder| builder.friend_graph(graph))
    }

    pub fn with_user_repo(repo: Arc<dyn UserRepository>) -> Self {
        Self::build(|builder| builder.user_repo(repo))
    }

    /// Harness with the given users signed up (and therefore logged in)
    pub async fn with_users(names: &[&str]) -> Self {
        let harness = Self::new();
        for name in names {
            harness.signup(name).await;
        }
        harness
    }

    fn build(customize: impl FnOnce(ServiceContextBuilder) -> ServiceContextBuilder) -> Self {
        let publisher = Arc::new(RecordingPublisher::default());
        let builder = ServiceContext::builder()
            .in_memory()
            .publisher(publisher.clone())
            .retry_policy(RetryPolicy::new(3, Duration::from_millis(1)));
        let builder = customize(builder);

        Self {
            ctx: builder.build().unwrap(),
            publisher,
        }
    }

    pub async fn signup(&self, name: &str) {
        SessionService::new(&self.ctx)
            .signup(signup_request(name))
            .await
            .unwrap();
    }
}

/// Signup form with password `{name}-password` and email `{name}@example.com`
pub fn signup_request(name: &str) -> SignupRequest {
    let mut first_name = name.to_string();
    if let Some(first) = first_name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }

    SignupRequest {
        username: name.to_string(),
        password: format!("{name}-password"),
        email: format!("{name}@example.com"),
        first_name,
        last_name: "Tester".to_string(),
        icon: None,
    }
}
