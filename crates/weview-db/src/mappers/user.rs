//! User model -> entity mapper

use weview_core::entities::User;
use weview_core::error::DomainError;
use weview_core::value_objects::Username;

use crate::models::UserModel;

/// Parse a username read back from storage
pub(crate) fn parse_username(raw: String) -> Result<Username, DomainError> {
    Username::parse(raw.as_str())
        .map_err(|e| DomainError::StoreError(format!("stored username {raw:?} is invalid: {e}")))
}

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        Ok(User {
            username: parse_username(model.username)?,
            email: model.email,
            password_hash: model.password_hash,
            first_name: model.first_name,
            last_name: model.last_name,
            icon: model.icon,
            storage_token: model.storage_token,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
