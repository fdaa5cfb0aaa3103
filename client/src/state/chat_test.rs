use super::*;

fn now() -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_714_555_800).expect("valid timestamp")
}

fn peer_frame(kind: FrameKind, username: &str, content: &str) -> ChatFrame {
    ChatFrame { kind, username: username.to_owned(), content: content.to_owned(), user_id: 4, ..ChatFrame::default() }
}

// =============================================================
// Seed
// =============================================================

#[test]
fn seeded_feed_has_two_system_entries() {
    let state = ChatState::seeded(now());
    let messages = state.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].id, 1);
    assert_eq!(messages[1].id, 2);
    assert!(messages.iter().all(|m| m.sender == Sender::System));
    assert_eq!(messages[1].timestamp, now() - time::Duration::minutes(5));
}

#[test]
fn default_state_is_empty() {
    let state = ChatState::default();
    assert!(state.messages().is_empty());
    assert!(state.draft().is_empty());
}

// =============================================================
// Submit
// =============================================================

#[test]
fn submit_hello_to_seeded_feed_appends_third_user_entry() {
    let mut state = ChatState::seeded(now());
    let msg = state.submit("hello", now()).expect("appended").clone();
    assert_eq!(msg.id, 3);
    assert_eq!(msg.sender.tag(), "user");
    assert_eq!(msg.text, "hello");
    assert_eq!(state.messages().len(), 3);
}

#[test]
fn submit_blank_text_is_ignored() {
    let mut state = ChatState::seeded(now());
    for text in ["", " ", "\t\n", "   \u{3000}"] {
        assert!(state.submit(text, now()).is_none(), "{text:?} should be rejected");
    }
    assert_eq!(state.messages().len(), 2);
}

#[test]
fn submit_keeps_text_verbatim() {
    let mut state = ChatState::default();
    let msg = state.submit("  padded  ", now()).expect("appended");
    assert_eq!(msg.text, "  padded  ");
    assert_eq!(msg.id, 1);
}

#[test]
fn submissions_preserve_order_with_increasing_ids() {
    let mut state = ChatState::seeded(now());
    let inputs = ["one", " ", "two", "", "three", "four"];
    for text in inputs {
        state.submit(text, now());
    }

    let user_texts: Vec<&str> = state
        .messages()
        .iter()
        .filter(|m| m.sender == Sender::User)
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(user_texts, vec!["one", "two", "three", "four"]);
    assert!(state.messages().windows(2).all(|w| w[0].id < w[1].id));
}

// =============================================================
// Draft
// =============================================================

#[test]
fn send_draft_clears_draft_on_success() {
    let mut state = ChatState::seeded(now());
    state.set_draft("ship it");
    assert!(state.can_send());
    let msg = state.send_draft(now()).expect("sent");
    assert_eq!(msg.text, "ship it");
    assert!(state.draft().is_empty());
    assert!(!state.can_send());
}

#[test]
fn send_draft_with_blank_draft_keeps_it() {
    let mut state = ChatState::seeded(now());
    state.set_draft("   ");
    assert!(!state.can_send());
    assert!(state.send_draft(now()).is_none());
    assert_eq!(state.draft(), "   ");
    assert_eq!(state.messages().len(), 2);
}

// =============================================================
// Receive
// =============================================================

#[test]
fn receive_message_frame_appends_peer_entry() {
    let mut state = ChatState::seeded(now());
    let msg = state.receive(&peer_frame(FrameKind::Message, "lisi", "design is up"), now()).expect("shown");
    assert_eq!(msg.sender, Sender::Peer("lisi".to_owned()));
    assert_eq!(msg.sender.tag(), "peer");
    assert_eq!(msg.id, 3);
}

#[test]
fn receive_names_anonymous_peer_by_id() {
    let mut state = ChatState::default();
    let msg = state.receive(&peer_frame(FrameKind::File, "", "files/plan.pdf"), now()).expect("shown");
    assert_eq!(msg.sender, Sender::Peer("user-4".to_owned()));
}

#[test]
fn receive_join_and_leave_become_system_notices() {
    let mut state = ChatState::default();
    state.receive(&peer_frame(FrameKind::Join, "wangwu", ""), now());
    state.receive(&peer_frame(FrameKind::Leave, "wangwu", ""), now());
    let texts: Vec<&str> = state.messages().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["wangwu joined the room", "wangwu left the room"]);
    assert!(state.messages().iter().all(|m| m.sender == Sender::System));
}

#[test]
fn receive_ignores_auth_unknown_and_blank_frames() {
    let mut state = ChatState::default();
    assert!(state.receive(&ChatFrame::auth("t"), now()).is_none());
    assert!(state.receive(&peer_frame(FrameKind::Unknown, "x", "typing"), now()).is_none());
    assert!(state.receive(&peer_frame(FrameKind::Message, "x", "  "), now()).is_none());
    assert!(state.messages().is_empty());
}
