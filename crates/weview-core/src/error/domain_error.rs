//! Domain errors - error types for the domain layer

use std::fmt;

use thiserror::Error;

use crate::entities::User;
use crate::value_objects::Username;

/// Unique user field that a signup can collide on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Username,
    Email,
}

impl UserField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Lookup / Session Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User is not logged in: {0}")]
    UserNotLoggedIn(Username),

    #[error("Invalid password")]
    InvalidPassword,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("{field} is already taken")]
    FieldConstraintViolation { field: UserField, user: Box<User> },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::UserNotLoggedIn(_) => "USER_NOT_LOGGED_IN",
            Self::InvalidPassword => "INVALID_PASSWORD",

            Self::ValidationError(_) | Self::InvalidUsername(_) => "VALIDATION_ERROR",
            Self::InvalidOperation(_) => "INVALID_OPERATION",

            Self::FieldConstraintViolation { .. } => "FIELD_CONSTRAINT_VIOLATION",

            Self::StoreError(_) => "STORE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidUsername(_) | Self::InvalidOperation(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::FieldConstraintViolation { .. })
    }

    /// Check if the failure came from a backing store and may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreError(_) | Self::CacheError(_))
    }
}
