//! User entity - a registered WeView account

use chrono::{DateTime, Utc};

use crate::value_objects::Username;

/// Registered user
///
/// Friends and pending friend requests live in the friend graph store and are
/// keyed by the username, which never changes after signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: Username,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub icon: Option<String>,
    pub storage_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a user from a signup record and an already hashed password
    pub fn from_new(new_user: NewUser, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            username: new_user.username,
            email: new_user.email,
            password_hash,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            icon: new_user.icon,
            storage_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a linked storage token has been stored for this user
    #[inline]
    pub fn has_linked_storage_token(&self) -> bool {
        self.storage_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Signup data for a new user; the password arrives already hashed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: Username,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub icon: Option<String>,
}
