//! Model to entity mappers
//!
//! Rows are converted with `TryFrom` because usernames are re-validated on
//! the way out of the database.

mod friend_request;
mod user;

pub(crate) use user::parse_username;
