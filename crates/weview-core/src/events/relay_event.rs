//! Relay events - payloads pushed to a user's topic
//!
//! Serialized as `{"event": "<kind>", "username": "<actor>"}` where `username`
//! is the user the event is about (the friend who logged in, the inviter, ...).

use serde::{Deserialize, Serialize};

use crate::value_objects::Username;

/// Event delivered to the subscribers of a user topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum RelayEvent {
    /// A friend came online
    Login { username: Username },
    /// A friend went offline
    Logout { username: Username },
    /// Invitation to watch together
    Invite { username: Username },
    /// The invited user accepted
    AcceptInvite { username: Username },
}

impl RelayEvent {
    /// Event kind as it appears on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Logout { .. } => "logout",
            Self::Invite { .. } => "invite",
            Self::AcceptInvite { .. } => "acceptInvite",
        }
    }

    /// User the event is about
    pub fn username(&self) -> &Username {
        match self {
            Self::Login { username }
            | Self::Logout { username }
            | Self::Invite { username }
            | Self::AcceptInvite { username } => username,
        }
    }

    /// Serialize to the JSON text sent to clients
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
