//! Friend request model -> entity mapper

use weview_core::entities::FriendRequestNotification;
use weview_core::error::DomainError;

use super::parse_username;
use crate::models::FriendRequestModel;

impl TryFrom<FriendRequestModel> for FriendRequestNotification {
    type Error = DomainError;

    fn try_from(model: FriendRequestModel) -> Result<Self, Self::Error> {
        Ok(FriendRequestNotification {
            message: model.message,
            created_at: model.created_at,
            requester_username: parse_username(model.requester_username)?,
        })
    }
}
