//! # weview-cache
//!
//! Shared-state layer for presence records, the guest counter, and the
//! cross-instance event bus.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Presence**: `presence:{username}` records via atomic `SET` / `DEL`
//! - **Guest Counter**: `INCR guest:counter`
//! - **Pub/Sub**: Relay events published on `user:{username}` channels
//!
//! Every Redis-backed store has a `DashMap` / atomic in-memory counterpart
//! for single-process deployments.
//!
//! ## Example
//!
//! ```ignore
//! use weview_cache::{RedisPool, RedisPoolConfig, RedisPresenceStore, RedisPublisher};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let presence = RedisPresenceStore::new(pool.clone());
//! let publisher = RedisPublisher::new(pool);
//!
//! presence.login(&username).await?;
//! publisher.publish(&Topic::user(&friend), &RelayEvent::Login { username }).await?;
//! ```

pub mod counter;
pub mod pool;
pub mod presence;
pub mod pubsub;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export presence types
pub use presence::{MemoryPresenceStore, RedisPresenceStore};

// Re-export counter types
pub use counter::{MemoryGuestCounter, RedisGuestCounter};

// Re-export pubsub types
pub use pubsub::{
    ReceivedMessage, RedisPublisher, Subscriber, SubscriberBuilder, SubscriberConfig,
    SubscriberError, SubscriberResult,
};
