//! Service context - dependency container for services
//!
//! Holds the stores, the event publisher and the password service needed by
//! services. Every store sits behind a trait so the same services run on
//! PostgreSQL/Redis or fully in memory.

use std::sync::Arc;

use weview_cache::{MemoryGuestCounter, MemoryPresenceStore};
use weview_common::PasswordService;
use weview_core::traits::{
    EventPublisher, FriendGraphStore, GuestCounter, PresenceStore, UserRepository,
};
use weview_db::{MemoryFriendGraphStore, MemoryUserRepository};

use super::error::{ServiceError, ServiceResult};
use super::retry::RetryPolicy;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Persistence
    user_repo: Arc<dyn UserRepository>,
    friend_graph: Arc<dyn FriendGraphStore>,

    // Shared session state
    presence_store: Arc<dyn PresenceStore>,
    guest_counter: Arc<dyn GuestCounter>,

    // Relay
    publisher: Arc<dyn EventPublisher>,

    password_service: PasswordService,
    retry_policy: RetryPolicy,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Stores ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the friend graph store
    pub fn friend_graph(&self) -> &dyn FriendGraphStore {
        self.friend_graph.as_ref()
    }

    /// Get the presence store
    pub fn presence_store(&self) -> &dyn PresenceStore {
        self.presence_store.as_ref()
    }

    /// Get the guest id counter
    pub fn guest_counter(&self) -> &dyn GuestCounter {
        self.guest_counter.as_ref()
    }

    // === Relay ===

    /// Get the event publisher
    pub fn publisher(&self) -> &dyn EventPublisher {
        self.publisher.as_ref()
    }

    // === Services ===

    /// Get the password service
    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }

    /// Retry policy for friend graph writes
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("stores", &"...")
            .field("retry_policy", &self.retry_policy)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    friend_graph: Option<Arc<dyn FriendGraphStore>>,
    presence_store: Option<Arc<dyn PresenceStore>>,
    guest_counter: Option<Arc<dyn GuestCounter>>,
    publisher: Option<Arc<dyn EventPublisher>>,
    retry_policy: RetryPolicy,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            user_repo: None,
            friend_graph: None,
            presence_store: None,
            guest_counter: None,
            publisher: None,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Fill every store with its in-memory implementation
    ///
    /// The publisher still has to be supplied.
    pub fn in_memory(self) -> Self {
        self.user_repo(Arc::new(MemoryUserRepository::new()))
            .friend_graph(Arc::new(MemoryFriendGraphStore::new()))
            .presence_store(Arc::new(MemoryPresenceStore::new()))
            .guest_counter(Arc::new(MemoryGuestCounter::new()))
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn friend_graph(mut self, store: Arc<dyn FriendGraphStore>) -> Self {
        self.friend_graph = Some(store);
        self
    }

    pub fn presence_store(mut self, store: Arc<dyn PresenceStore>) -> Self {
        self.presence_store = Some(store);
        self
    }

    pub fn guest_counter(mut self, counter: Arc<dyn GuestCounter>) -> Self {
        self.guest_counter = Some(counter);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            user_repo: self
                .user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            friend_graph: self
                .friend_graph
                .ok_or_else(|| ServiceError::validation("friend_graph is required"))?,
            presence_store: self
                .presence_store
                .ok_or_else(|| ServiceError::validation("presence_store is required"))?,
            guest_counter: self
                .guest_counter
                .ok_or_else(|| ServiceError::validation("guest_counter is required"))?,
            publisher: self
                .publisher
                .ok_or_else(|| ServiceError::validation("publisher is required"))?,
            password_service: PasswordService::new(),
            retry_policy: self.retry_policy,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
