//! Presence storage module.
//!
//! Records which users are logged in, keyed by username.

mod memory_presence;
mod redis_presence;

pub use memory_presence::MemoryPresenceStore;
pub use redis_presence::RedisPresenceStore;
