#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use frames::{ChatFrame, FrameKind};
use time::OffsetDateTime;

/// Who a feed entry came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sender {
    /// Typed locally.
    User,
    /// Seeded notices and service announcements.
    System,
    /// Another room member, by display name.
    Peer(String),
}

impl Sender {
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::System => "system",
            Self::Peer(_) => "peer",
        }
    }
}

/// A single entry in the conversation feed. Never mutated once appended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: OffsetDateTime,
}

/// In-memory conversation feed plus the composer draft.
///
/// Lives only as long as the page that mounted it.
#[derive(Clone, Debug, Default)]
pub struct ChatState {
    messages: Vec<ChatMessage>,
    draft: String,
}

impl ChatState {
    /// Feed with the two welcome notices shown on first mount.
    #[must_use]
    pub fn seeded(now: OffsetDateTime) -> Self {
        let mut state = Self::default();
        state.append("Hello! Welcome to the chat app".to_owned(), Sender::System, now);
        state.append(
            "This is a DingTalk-style chat interface".to_owned(),
            Sender::System,
            now - time::Duration::minutes(5),
        );
        state
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Append a locally typed message. Blank text is ignored.
    pub fn submit(&mut self, text: &str, now: OffsetDateTime) -> Option<&ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }
        Some(self.append(text.to_owned(), Sender::User, now))
    }

    /// Append a frame received from the room's channel, if it is something
    /// the feed shows.
    pub fn receive(&mut self, frame: &ChatFrame, now: OffsetDateTime) -> Option<&ChatMessage> {
        let name = if frame.username.is_empty() {
            format!("user-{}", frame.user_id)
        } else {
            frame.username.clone()
        };

        let (text, sender) = match frame.kind {
            FrameKind::Message | FrameKind::File => (frame.content.clone(), Sender::Peer(name)),
            FrameKind::System => (frame.content.clone(), Sender::System),
            FrameKind::Join => (format!("{name} joined the room"), Sender::System),
            FrameKind::Leave => (format!("{name} left the room"), Sender::System),
            FrameKind::Auth | FrameKind::Unknown => return None,
        };
        if text.trim().is_empty() {
            return None;
        }
        Some(self.append(text, sender, now))
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Whether the send button is enabled.
    #[must_use]
    pub fn can_send(&self) -> bool {
        !self.draft.trim().is_empty()
    }

    /// Submit the draft, clearing it only when something was appended.
    pub fn send_draft(&mut self, now: OffsetDateTime) -> Option<&ChatMessage> {
        if !self.can_send() {
            return None;
        }
        let text = std::mem::take(&mut self.draft);
        self.submit(&text, now)
    }

    fn append(&mut self, text: String, sender: Sender, timestamp: OffsetDateTime) -> &ChatMessage {
        let id = self.messages.last().map_or(1, |m| m.id + 1);
        self.messages.push(ChatMessage { id, text, sender, timestamp });
        &self.messages[self.messages.len() - 1]
    }
}
