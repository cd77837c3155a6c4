//! Repository implementations
//!
//! PostgreSQL implementations of the store traits defined in weview-core.

mod error;
mod friend_graph;
mod user;

pub use friend_graph::PgFriendGraphStore;
pub use user::PgUserRepository;
