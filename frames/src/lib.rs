//! Shared frame model and JSON codec for the chat streaming channel.
//!
//! This crate owns the wire representation exchanged with the backend chat
//! service over a room's WebSocket. Frames are JSON objects; every field but
//! `type` is optional on the wire so that frames from older or newer peers
//! still decode.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error returned by [`encode_frame`] and [`decode_frame`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text was not valid JSON, or a field had the wrong type.
    #[error("failed to decode JSON frame: {0}")]
    Json(#[from] serde_json::Error),
    /// The text was valid JSON but not an object.
    #[error("frame must be a JSON object, got {0}")]
    NotObject(&'static str),
}

/// Kind of a frame, carried in the `type` field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    /// Credential handshake sent by the client after the channel opens.
    Auth,
    /// Plain text chat message.
    Message,
    /// Chat message whose content references an uploaded file.
    File,
    /// A member entered the room.
    Join,
    /// A member left the room.
    Leave,
    /// Notice generated by the service itself.
    System,
    /// Any kind this client does not know about.
    #[default]
    #[serde(other)]
    Unknown,
}

impl FrameKind {
    /// Whether frames of this kind carry user-authored content for the feed.
    #[must_use]
    pub fn is_chat(self) -> bool {
        matches!(self, Self::Message | Self::File)
    }
}

/// A single frame on the streaming channel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatFrame {
    /// Frame kind.
    #[serde(rename = "type", default)]
    pub kind: FrameKind,
    /// Message text, file reference, or notice body.
    #[serde(default)]
    pub content: String,
    /// Numeric id of the author, `0` when unknown.
    #[serde(default)]
    pub user_id: u64,
    /// Display name of the author.
    #[serde(default)]
    pub username: String,
    /// Numeric id of the room the frame belongs to, `0` when unknown.
    #[serde(default)]
    pub chat_room_id: u64,
    /// RFC 3339 timestamp assigned by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Credential, only present on `auth` frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl ChatFrame {
    /// Build an outbound text message frame.
    #[must_use]
    pub fn message(content: impl Into<String>) -> Self {
        Self { kind: FrameKind::Message, content: content.into(), ..Self::default() }
    }

    /// Build an outbound credential frame.
    #[must_use]
    pub fn auth(token: impl Into<String>) -> Self {
        Self { kind: FrameKind::Auth, token: Some(token.into()), ..Self::default() }
    }
}

/// Encode a frame into JSON text.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialization fails.
pub fn encode_frame(frame: &ChatFrame) -> Result<String, CodecError> {
    Ok(serde_json::to_string(frame)?)
}

/// Decode JSON text into a frame.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for malformed JSON or mistyped fields and
/// [`CodecError::NotObject`] when the JSON value is not an object.
pub fn decode_frame(text: &str) -> Result<ChatFrame, CodecError> {
    let value = serde_json::from_str::<Value>(text)?;
    if !value.is_object() {
        return Err(CodecError::NotObject(json_type_name(&value)));
    }
    Ok(serde_json::from_value(value)?)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
