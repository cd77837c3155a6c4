//! Domain entities - core business objects

mod friend_request;
mod user;

pub use friend_request::FriendRequestNotification;
pub use user::{NewUser, User};
