//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use weview_core::entities::User;
use weview_core::error::{DomainError, UserField};

const EMAIL_CONSTRAINT: &str = "users_email_key";

pub const FRIENDSHIP_OWNER_FK: &str = "friendships_owner_fkey";
pub const FRIENDSHIP_FRIEND_FK: &str = "friendships_friend_fkey";
pub const REQUEST_TARGET_FK: &str = "friend_requests_target_fkey";
pub const REQUEST_REQUESTER_FK: &str = "friend_requests_requester_fkey";

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::StoreError(e.to_string())
}

/// Map a unique violation on the users table to the field that clashed
pub fn map_user_insert_error(e: SqlxError, user: &User) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            let field = match db_err.constraint() {
                Some(EMAIL_CONSTRAINT) => UserField::Email,
                _ => UserField::Username,
            };
            return DomainError::FieldConstraintViolation {
                field,
                user: Box::new(user.clone()),
            };
        }
    }
    map_db_error(e)
}

/// Map a foreign key violation (unknown username) to `UserNotFound`
///
/// `users` pairs each foreign key constraint of the statement with the
/// username it checks, so the error names the user that is actually missing.
pub fn map_graph_error(e: SqlxError, users: &[(&str, &str)]) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return DomainError::UserNotFound(missing_user(db_err.constraint(), users));
        }
    }
    map_db_error(e)
}

fn missing_user(constraint: Option<&str>, users: &[(&str, &str)]) -> String {
    match users.iter().find(|(name, _)| Some(*name) == constraint) {
        Some((_, username)) => (*username).to_string(),
        None => users
            .iter()
            .map(|(_, username)| *username)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_user_follows_constraint() {
        let users = [(FRIENDSHIP_OWNER_FK, "alice"), (FRIENDSHIP_FRIEND_FK, "ghost")];

        assert_eq!(missing_user(Some(FRIENDSHIP_FRIEND_FK), &users), "ghost");
        assert_eq!(missing_user(Some(FRIENDSHIP_OWNER_FK), &users), "alice");
    }

    #[test]
    fn test_missing_user_unknown_constraint_names_all() {
        let users = [(REQUEST_TARGET_FK, "bob"), (REQUEST_REQUESTER_FK, "carol")];

        assert_eq!(missing_user(None, &users), "bob, carol");
        assert_eq!(missing_user(Some("other_fkey"), &users), "bob, carol");
    }
}
