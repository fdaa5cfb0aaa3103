use super::*;

fn sample_frame() -> ChatFrame {
    ChatFrame {
        kind: FrameKind::Message,
        content: "hello room".to_owned(),
        user_id: 7,
        username: "zhangsan".to_owned(),
        chat_room_id: 3,
        timestamp: Some("2024-05-01T09:30:00Z".to_owned()),
        token: None,
    }
}

#[test]
fn encode_uses_type_field_for_kind() {
    let json = encode_frame(&sample_frame()).expect("encode");
    let value: Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["type"], "message");
    assert_eq!(value["content"], "hello room");
    assert_eq!(value["chat_room_id"], 3);
}

#[test]
fn encode_omits_absent_token_and_timestamp() {
    let json = encode_frame(&ChatFrame::message("hi")).expect("encode");
    let value: Value = serde_json::from_str(&json).expect("valid json");
    assert!(value.get("token").is_none());
    assert!(value.get("timestamp").is_none());
}

#[test]
fn decode_reads_backend_broadcast() {
    let text = r#"{"type":"message","content":"hi all","user_id":2,"username":"lisi","chat_room_id":1,"timestamp":"2024-05-01T09:31:00Z"}"#;
    let frame = decode_frame(text).expect("decode");
    assert_eq!(frame.kind, FrameKind::Message);
    assert_eq!(frame.content, "hi all");
    assert_eq!(frame.user_id, 2);
    assert_eq!(frame.username, "lisi");
    assert_eq!(frame.timestamp.as_deref(), Some("2024-05-01T09:31:00Z"));
}

#[test]
fn decode_defaults_missing_fields() {
    let frame = decode_frame(r#"{"type":"join"}"#).expect("decode");
    assert_eq!(frame.kind, FrameKind::Join);
    assert!(frame.content.is_empty());
    assert_eq!(frame.user_id, 0);
    assert_eq!(frame.timestamp, None);
}

#[test]
fn decode_maps_unrecognized_kind_to_unknown() {
    let frame = decode_frame(r#"{"type":"typing","content":"x"}"#).expect("decode");
    assert_eq!(frame.kind, FrameKind::Unknown);
    assert_eq!(frame.content, "x");
}

#[test]
fn decode_without_type_is_unknown() {
    let frame = decode_frame(r#"{"content":"orphan"}"#).expect("decode");
    assert_eq!(frame.kind, FrameKind::Unknown);
}

#[test]
fn decode_rejects_malformed_json() {
    let err = decode_frame("{not json").expect_err("should fail");
    assert!(matches!(err, CodecError::Json(_)));
}

#[test]
fn decode_rejects_non_object_json() {
    let err = decode_frame("[1,2,3]").expect_err("should fail");
    assert!(matches!(err, CodecError::NotObject("array")));

    let err = decode_frame("\"text\"").expect_err("should fail");
    assert!(matches!(err, CodecError::NotObject("string")));
}

#[test]
fn decode_rejects_mistyped_field() {
    let err = decode_frame(r#"{"type":"message","user_id":"seven"}"#).expect_err("should fail");
    assert!(matches!(err, CodecError::Json(_)));
}

#[test]
fn auth_frame_carries_token() {
    let frame = ChatFrame::auth("jwt-abc");
    assert_eq!(frame.kind, FrameKind::Auth);
    assert_eq!(frame.token.as_deref(), Some("jwt-abc"));
    let decoded = decode_frame(&encode_frame(&frame).expect("encode")).expect("decode");
    assert_eq!(decoded, frame);
}

#[test]
fn chat_kinds_are_message_and_file() {
    assert!(FrameKind::Message.is_chat());
    assert!(FrameKind::File.is_chat());
    assert!(!FrameKind::Auth.is_chat());
    assert!(!FrameKind::System.is_chat());
    assert!(!FrameKind::Unknown.is_chat());
}
