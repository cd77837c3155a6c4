//! Value objects - immutable types that represent domain concepts

mod topic;
mod username;

pub use topic::Topic;
pub use username::{Username, UsernameError};
