//! Username - the immutable unique identifier of a user
//!
//! Usernames double as topic suffixes and Redis key suffixes, so characters that
//! act as separators or glob patterns in those namespaces are rejected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Validated username
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Maximum username length in characters
    pub const MAX_LEN: usize = 64;

    /// Parse and validate a username
    pub fn parse(raw: impl Into<String>) -> Result<Self, UsernameError> {
        let raw = raw.into();

        if raw.is_empty() {
            return Err(UsernameError::Empty);
        }
        if raw.chars().count() > Self::MAX_LEN {
            return Err(UsernameError::TooLong { max: Self::MAX_LEN });
        }
        if let Some(c) = raw.chars().find(|c| !Self::is_allowed(*c)) {
            return Err(UsernameError::InvalidCharacter(c));
        }

        Ok(Self(raw))
    }

    #[inline]
    fn is_allowed(c: char) -> bool {
        !c.is_whitespace() && !c.is_control() && !matches!(c, '/' | ':' | '*' | '?' | '[' | ']')
    }

    /// Borrow the username as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Error when validating a username
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    #[error("username must not be empty")]
    Empty,

    #[error("username must be at most {max} characters")]
    TooLong { max: usize },

    #[error("username contains invalid character {0:?}")]
    InvalidCharacter(char),
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Username::parse(s)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Username::parse(value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl PartialEq<str> for Username {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Username {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
