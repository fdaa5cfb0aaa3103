//! The chat page: sidebar, conversation feed, and live connection status.

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

use time::OffsetDateTime;

use super::chat::ChatState;
use super::sidebar::SidebarState;
use crate::net::connection::ConnectionState;
use crate::net::socket::SocketEvent;

#[derive(Clone, Debug)]
pub struct ChatPage {
    pub sidebar: SidebarState,
    pub chat: ChatState,
    pub status: ConnectionState,
    /// Last socket error or close reason, cleared on the next open.
    pub notice: Option<String>,
    /// Own username; the room echoes our messages back and those are
    /// already in the feed.
    identity: Option<String>,
}

impl ChatPage {
    /// State shown the first time the page is displayed.
    #[must_use]
    pub fn mount(now: OffsetDateTime) -> Self {
        Self {
            sidebar: SidebarState::seeded(),
            chat: ChatState::seeded(now),
            status: ConnectionState::Idle,
            notice: None,
            identity: None,
        }
    }

    #[must_use]
    pub fn with_identity(mut self, username: impl Into<String>) -> Self {
        self.identity = Some(username.into());
        self
    }

    pub fn apply(&mut self, event: &SocketEvent, now: OffsetDateTime) {
        match event {
            SocketEvent::Opened { .. } => {
                self.status = ConnectionState::Open;
                self.notice = None;
            }
            SocketEvent::Frame(frame) => {
                if self.identity.as_deref() == Some(frame.username.as_str()) && frame.kind.is_chat() {
                    return;
                }
                self.chat.receive(frame, now);
            }
            SocketEvent::Error(message) => self.notice = Some(message.clone()),
            SocketEvent::Closed { code, reason } => {
                self.status = ConnectionState::Closed;
                self.notice = Some(if reason.is_empty() {
                    format!("closed ({code})")
                } else {
                    format!("closed ({code}): {reason}")
                });
            }
            SocketEvent::Retrying { attempt, .. } => self.status = ConnectionState::Retrying(*attempt),
            SocketEvent::Exhausted { attempts } => {
                self.status = ConnectionState::Closed;
                self.notice = Some(format!("gave up after {attempts} reconnect attempts"));
            }
        }
    }
}
