//! Friend request database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for friend_requests table
#[derive(Debug, Clone, FromRow)]
pub struct FriendRequestModel {
    pub target_username: String,
    pub requester_username: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
