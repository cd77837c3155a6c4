//! In-memory stores
//!
//! `DashMap`-backed implementations of the user repository and friend graph
//! store. Used when `STORAGE_BACKEND=memory` and by service tests.

mod friend_graph;
mod user;

pub use friend_graph::MemoryFriendGraphStore;
pub use user::MemoryUserRepository;
