//! Client and server frame formats
//!
//! Clients send JSON text frames naming an action, the user to notify and
//! optionally the acting user. Server frames are relay event payloads, or an
//! error frame when a client frame could not be acted on.

use serde::{Deserialize, Serialize};

/// Action requested by a client frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
    /// The actor came online
    FriendLogin,
    /// The actor went offline
    FriendLogout,
    /// The actor invites the target to watch together
    Invite,
    /// The actor accepted the target's watch invite
    #[serde(alias = "accept-invite")]
    Accept,
}

impl Destination {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FriendLogin => "friend-login",
            Self::FriendLogout => "friend-logout",
            Self::Invite => "invite",
            Self::Accept => "accept",
        }
    }
}

/// Frame sent by a client
#[derive(Debug, Clone, Deserialize)]
pub struct ClientFrame {
    pub destination: Destination,
    /// User whose topic receives the event
    pub target: String,
    /// Acting user, defaults to the connection's user
    #[serde(default)]
    pub username: Option<String>,
}

impl ClientFrame {
    /// Parse from a text frame
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Acting user, falling back to the connection owner
    pub fn actor<'a>(&'a self, connection_owner: &'a str) -> &'a str {
        self.username.as_deref().unwrap_or(connection_owner)
    }
}

/// Frame sent back when a client frame fails
#[derive(Debug, Clone, Serialize)]
pub struct ErrorFrame {
    pub error: ErrorFrameBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorFrameBody {
    pub code: String,
    pub message: String,
}

impl ErrorFrame {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorFrameBody {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
