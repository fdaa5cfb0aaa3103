//! REST DTOs for the backend chat service.
//!
//! DESIGN
//! ======
//! Field names follow the backend's JSON. Timestamps stay as the RFC 3339
//! strings the service sends; nothing in the client does arithmetic on them.
//! Optional fields default so partial records still decode.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Success code used by the backend response envelope.
pub const CODE_SUCCESS: i64 = 1000;

/// Envelope the backend wraps around every response body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub messages: String,
    pub data: Option<T>,
}

/// An account as returned by `/login` and `/profile`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// A chat room record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRoom {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_by: u64,
    #[serde(default)]
    pub creator: Option<User>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A persisted message in a room's history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMessage {
    pub id: u64,
    pub content: String,
    #[serde(default)]
    pub user_id: u64,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub chat_room_id: u64,
    /// `"message"` or `"file"` when the service reports it.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl RoomMessage {
    /// Author name, falling back to the numeric id.
    #[must_use]
    pub fn author(&self) -> String {
        self.user
            .as_ref()
            .map_or_else(|| format!("user-{}", self.user_id), |u| u.username.clone())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateChatroomRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Paging parameters for `GET /chatrooms/{id}/messages`.
///
/// Zero values are treated as unset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MessageQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl MessageQuery {
    /// Render as a query string including the leading `?`, or empty when no
    /// parameter is set.
    #[must_use]
    pub fn to_query_string(self) -> String {
        let params: Vec<String> = [("limit", self.limit), ("offset", self.offset)]
            .into_iter()
            .filter_map(|(key, value)| value.filter(|v| *v > 0).map(|v| format!("{key}={v}")))
            .collect();
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}
