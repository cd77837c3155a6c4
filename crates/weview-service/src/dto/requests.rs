//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Session Requests
// ============================================================================

/// Login form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// `?username=` on logout
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LogoutQuery {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,
}

/// Signup form
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,

    #[validate(length(max = 2048, message = "Icon must be at most 2048 characters"))]
    pub icon: Option<String>,
}

// ============================================================================
// Friend Requests
// ============================================================================

/// Search parameter of `search-friend`, a username or an email
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchFriendQuery {
    #[serde(alias = "searchParam")]
    #[validate(length(min = 1, message = "Search query is required"))]
    pub query: String,
}
