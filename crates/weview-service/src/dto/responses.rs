//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output, in camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use weview_core::{User, UserField, Username};

// ============================================================================
// Session Responses
// ============================================================================

/// Path the client should navigate to after a session operation
///
/// Serialized as a bare JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionTarget(String);

impl SessionTarget {
    /// `/user/{username}`
    pub fn user_page(username: &Username) -> Self {
        Self(format!("/user/{username}"))
    }

    /// `/`
    pub fn home() -> Self {
        Self("/".to_string())
    }

    /// `/{id}/player`
    pub fn guest_player(guest_id: u64) -> Self {
        Self(format!("/{guest_id}/player"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// User Responses
// ============================================================================

/// Client view of a user
///
/// `isLoggedIn` and `hasLinkedStorageToken` are null in search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_logged_in: Option<bool>,
    pub has_linked_storage_token: Option<bool>,
    pub icon: Option<String>,
}

impl UserSummary {
    /// Full view including presence and storage link
    pub fn with_status(user: &User, is_logged_in: bool) -> Self {
        Self {
            is_logged_in: Some(is_logged_in),
            has_linked_storage_token: Some(user.has_linked_storage_token()),
            ..Self::public(user)
        }
    }

    /// Search view, without presence or storage link
    pub fn public(user: &User) -> Self {
        Self {
            username: user.username.to_string(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_logged_in: None,
            has_linked_storage_token: None,
            icon: user.icon.clone(),
        }
    }
}

/// `GET /user/{username}/friends`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendsResponse {
    pub friends: Vec<UserSummary>,
}

/// Details of a signup rejected on a unique field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolationResponse {
    pub violating_field: String,
    pub violating_user: UserSummary,
}

impl FieldViolationResponse {
    pub fn new(field: UserField, user: &User) -> Self {
        Self {
            violating_field: field.as_str().to_string(),
            violating_user: UserSummary::public(user),
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing store, `None` when not configured
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis: Option<String>,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: Option<bool>, redis_healthy: Option<bool>) -> Self {
        let all_healthy = database_healthy.unwrap_or(true) && redis_healthy.unwrap_or(true);
        let describe = |healthy: bool| if healthy { "healthy" } else { "unhealthy" }.to_string();
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: database_healthy.map(describe),
                redis: redis_healthy.map(describe),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
