//! Database models
//!
//! Row types with SQLx `FromRow` derives. Conversions into domain entities
//! live in `mappers`.

mod friend_request;
mod user;

pub use friend_request::FriendRequestModel;
pub use user::UserModel;
