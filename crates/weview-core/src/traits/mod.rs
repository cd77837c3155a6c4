//! Store and relay traits (ports)

mod repositories;

pub use repositories::{
    EventPublisher, FriendGraphStore, GuestCounter, PresenceStore, RepoResult, UserRepository,
};
