//! Friend request notification - a pending request shown to its target

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Username;

/// Pending friend request, keyed by (target, requester)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestNotification {
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub requester_username: Username,
}

impl FriendRequestNotification {
    /// New notification from `requester`, stamped now
    pub fn new(requester: &Username) -> Self {
        Self::at(requester, Utc::now())
    }

    /// New notification from `requester` with an explicit timestamp
    pub fn at(requester: &Username, created_at: DateTime<Utc>) -> Self {
        Self {
            message: format!("{requester} has invited you to be his friend"),
            created_at,
            requester_username: requester.clone(),
        }
    }
}
