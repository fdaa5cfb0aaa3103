use super::*;

fn now() -> OffsetDateTime {
    // 2024-05-01 09:30:00 UTC
    OffsetDateTime::from_unix_timestamp(1_714_555_800).expect("valid timestamp")
}

// =============================================================
// Time labels
// =============================================================

#[test]
fn time_label_is_zero_padded() {
    assert_eq!(time_label(now()), "09:30");
    assert_eq!(time_label(now() - time::Duration::minutes(35)), "08:55");
}

// =============================================================
// Sidebar
// =============================================================

#[test]
fn sidebar_shows_title_hint_rooms_and_contacts() {
    let lines = render_sidebar(&SidebarState::seeded());
    assert_eq!(lines[0], "ChatApp  [+]");
    assert_eq!(lines[1], "[ Search chatrooms or contacts... ]");

    let text = lines.join("\n");
    assert!(text.contains("Tech Talk"));
    assert!(text.contains("Design Team"));
    assert!(text.contains("Product Planning"));
    assert!(text.contains("● [Z] Zhang San - Product manager"));
    assert!(text.contains("◐ [L] Li Si - UI designer"));
    assert!(text.contains("○ [W] Wang Wu - Backend developer"));
}

#[test]
fn contact_rows_spell_out_presence() {
    let lines = render_sidebar(&SidebarState::seeded());
    let row = |name: &str| lines.iter().find(|l| l.contains(name)).cloned().expect("contact row");
    assert!(row("Zhang San - ").ends_with("(online)"));
    assert!(row("Li Si - ").ends_with("(away)"));
    assert!(row("Wang Wu - ").ends_with("(offline)"));
}

#[test]
fn sidebar_marks_active_room_with_unread_badge() {
    let lines = render_sidebar(&SidebarState::seeded());
    let active = lines.iter().find(|l| l.contains("Tech Talk")).expect("tech talk row");
    assert!(active.starts_with("> [#]"));
    assert!(active.ends_with("(3)"));

    let other = lines.iter().find(|l| l.contains("Design Team")).expect("design row");
    assert!(other.starts_with("  [D]"));
    assert!(!other.ends_with(')'));
}

#[test]
fn sidebar_echoes_query_and_filters() {
    let mut sidebar = SidebarState::seeded();
    sidebar.search("wang");
    let text = render_sidebar(&sidebar).join("\n");
    assert!(text.contains("[ wang ]"));
    assert!(text.contains("Wang Wu - Backend developer"));
    assert!(!text.contains("Zhang San - Product manager"));
}

// =============================================================
// Conversation
// =============================================================

#[test]
fn conversation_has_header_banner_and_seed_feed() {
    let page = ChatPage::mount(now());
    let lines = render_conversation(&page);
    assert_eq!(lines[0], "Tech Talk  [idle]");
    assert_eq!(lines[1], "Zhang San, Li Si online");
    assert!(lines.contains(&"-- Today --".to_owned()));
    assert!(lines.contains(&"[09:30] sys: Hello! Welcome to the chat app".to_owned()));
    assert!(lines.contains(&"[09:25] sys: This is a DingTalk-style chat interface".to_owned()));
    assert_eq!(lines.last().map(String::as_str), Some("> Type a message...  [Send disabled]"));
}

#[test]
fn conversation_prefixes_user_and_peer_lines() {
    let mut page = ChatPage::mount(now());
    page.chat.submit("hello", now());
    page.apply(
        &crate::net::socket::SocketEvent::Frame(frames::ChatFrame {
            kind: frames::FrameKind::Message,
            username: "lisi".to_owned(),
            content: "hi".to_owned(),
            ..frames::ChatFrame::default()
        }),
        now(),
    );
    let lines = render_conversation(&page);
    assert!(lines.contains(&"[09:30] me: hello".to_owned()));
    assert!(lines.contains(&"[09:30] lisi: hi".to_owned()));
}

#[test]
fn conversation_shows_draft_and_notice() {
    let mut page = ChatPage::mount(now());
    page.chat.set_draft("almost");
    page.notice = Some("closed (1006)".to_owned());
    let lines = render_conversation(&page);
    assert!(lines.contains(&"! closed (1006)".to_owned()));
    assert_eq!(lines.last().map(String::as_str), Some("> almost  [Send]"));
}

#[test]
fn page_joins_sidebar_and_conversation() {
    let page = ChatPage::mount(now());
    let text = render_page(&page);
    let sidebar_at = text.find("ChatApp").expect("title");
    let header_at = text.find("Tech Talk  [idle]").expect("header");
    assert!(sidebar_at < header_at);
    assert!(text.contains("\n\nTech Talk  [idle]"));
}
