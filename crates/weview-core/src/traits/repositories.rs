//! Store traits (ports) - define the interface for shared state
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! (PostgreSQL, Redis, in-memory maps) provides the implementation.
//! Every mutating operation must map onto an atomic primitive of the
//! backing store; implementations never read-then-write.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::entities::{FriendRequestNotification, User};
use crate::error::DomainError;
use crate::events::RelayEvent;
use crate::value_objects::{Topic, Username};

/// Result type for store operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by username
    async fn find_by_username(&self, username: &Username) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Create a new user
    ///
    /// Fails with `FieldConstraintViolation` when the username or email is taken.
    async fn create(&self, user: &User) -> RepoResult<()>;
}

// ============================================================================
// Friend Graph Store
// ============================================================================

#[async_trait]
pub trait FriendGraphStore: Send + Sync {
    /// Insert or overwrite the pending request from `request.requester_username` to `target`
    async fn upsert_request(
        &self,
        target: &Username,
        request: &FriendRequestNotification,
    ) -> RepoResult<()>;

    /// Remove the pending request from `requester` to `target`, returns whether one existed
    async fn remove_request(&self, target: &Username, requester: &Username) -> RepoResult<bool>;

    /// Add `friend` to `owner`'s friend set (one direction, idempotent)
    async fn add_friend(&self, owner: &Username, friend: &Username) -> RepoResult<()>;

    /// Friend set of `owner`
    async fn friends(&self, owner: &Username) -> RepoResult<BTreeSet<Username>>;

    /// Pending requests addressed to `target`, oldest first
    async fn pending_requests(&self, target: &Username)
        -> RepoResult<Vec<FriendRequestNotification>>;
}

// ============================================================================
// Presence Store
// ============================================================================

#[async_trait]
pub trait PresenceStore: Send + Sync {
    /// Mark a user as logged in (idempotent)
    async fn login(&self, username: &Username) -> RepoResult<()>;

    /// Remove the presence record, `UserNotLoggedIn` if there was none
    async fn logout(&self, username: &Username) -> RepoResult<()>;

    /// Check whether a presence record exists
    async fn is_logged_in(&self, username: &Username) -> RepoResult<bool>;
}

// ============================================================================
// Event Publisher
// ============================================================================

#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish to every current subscriber of `topic`
    ///
    /// Returns the number of subscribers the event was handed to. Zero
    /// subscribers is not an error.
    async fn publish(&self, topic: &Topic, event: &RelayEvent) -> RepoResult<usize>;
}

// ============================================================================
// Guest Counter
// ============================================================================

#[async_trait]
pub trait GuestCounter: Send + Sync {
    /// Atomically allocate the next guest id
    async fn next_guest_id(&self) -> RepoResult<u64>;
}
