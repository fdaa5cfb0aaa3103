#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use time::OffsetDateTime;

use crate::state::chat::{ChatMessage, Sender};
use crate::state::page::ChatPage;
use crate::state::sidebar::SidebarState;

const APP_TITLE: &str = "ChatApp";
const SEARCH_HINT: &str = "Search chatrooms or contacts...";
const INPUT_HINT: &str = "Type a message...";
const RULE: &str = "----------------------------------------";

/// `HH:MM` in the timestamp's own offset.
#[must_use]
pub fn time_label(at: OffsetDateTime) -> String {
    format!("{:02}:{:02}", at.hour(), at.minute())
}

#[must_use]
pub fn render_sidebar(sidebar: &SidebarState) -> Vec<String> {
    let mut lines = vec![format!("{APP_TITLE}  [+]")];
    if sidebar.query().trim().is_empty() {
        lines.push(format!("[ {SEARCH_HINT} ]"));
    } else {
        lines.push(format!("[ {} ]", sidebar.query()));
    }
    lines.push(RULE.to_owned());

    lines.push("Chats".to_owned());
    for room in sidebar.visible_rooms() {
        let cursor = if sidebar.is_active(&room.id) { '>' } else { ' ' };
        let badge = if room.unread > 0 { format!(" ({})", room.unread) } else { String::new() };
        lines.push(format!("{cursor} [{}] {:<18} {:>9}{badge}", room.glyph, room.name, room.activity));
        lines.push(format!("      {}", room.preview));
    }

    lines.push(RULE.to_owned());
    lines.push("Contacts".to_owned());
    for contact in sidebar.visible_contacts() {
        lines.push(format!(
            "  {} [{}] {} - {} ({})",
            contact.presence.marker(),
            contact.glyph(),
            contact.name,
            contact.role,
            contact.presence.label()
        ));
    }
    lines
}

#[must_use]
pub fn render_conversation(page: &ChatPage) -> Vec<String> {
    let title = page.sidebar.active_room().map_or("No room selected", |room| room.name.as_str());
    let mut lines = vec![
        format!("{title}  [{}]", page.status.label()),
        page.sidebar.online_summary(),
    ];
    if let Some(notice) = &page.notice {
        lines.push(format!("! {notice}"));
    }
    lines.push(RULE.to_owned());

    lines.push("-- Today --".to_owned());
    lines.push("This is where the conversation begins. Say hello!".to_owned());
    lines.extend(page.chat.messages().iter().map(render_message));

    lines.push(RULE.to_owned());
    let draft = page.chat.draft();
    if page.chat.can_send() {
        lines.push(format!("> {draft}  [Send]"));
    } else {
        lines.push(format!("> {INPUT_HINT}  [Send disabled]"));
    }
    lines
}

/// Sidebar followed by the open conversation.
#[must_use]
pub fn render_page(page: &ChatPage) -> String {
    let mut lines = render_sidebar(&page.sidebar);
    lines.push(String::new());
    lines.extend(render_conversation(page));
    lines.join("\n")
}

/// One feed line: `[HH:MM] who: text`.
#[must_use]
pub fn render_message(message: &ChatMessage) -> String {
    let who = match &message.sender {
        Sender::User => "me",
        Sender::System => "sys",
        Sender::Peer(name) => name.as_str(),
    };
    format!("[{}] {who}: {}", time_label(message.timestamp), message.text)
}
