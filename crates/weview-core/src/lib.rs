//! # weview-core
//!
//! Domain layer containing the user and friend-request entities, value objects,
//! store traits (ports) and the payloads relayed to connected clients.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{FriendRequestNotification, NewUser, User};
pub use error::{DomainError, UserField};
pub use events::RelayEvent;
pub use traits::{
    EventPublisher, FriendGraphStore, GuestCounter, PresenceStore, RepoResult, UserRepository,
};
pub use value_objects::{Topic, Username, UsernameError};
