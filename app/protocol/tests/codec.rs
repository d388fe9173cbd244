//! Envelope codec tests.

use parlor_protocol::codec::{CodecError, decode, encode};
use parlor_protocol::{ChatMessage, ClientEvent, Sender, ServerEvent, UserType};

#[test]
fn decode_agent_message() {
    let frame = r#"{"event":"message","data":{"text":"How can I help?","sender":"agent","timestamp":"2026-01-02T03:04:05"}}"#;
    let event = decode(frame).unwrap().unwrap();
    match event {
        ServerEvent::Message(msg) => {
            assert_eq!(msg.text, "How can I help?");
            assert_eq!(msg.sender, Sender::Agent);
            assert_eq!(msg.timestamp.as_deref(), Some("2026-01-02T03:04:05"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn decode_message_ignores_extra_fields() {
    let frame = r#"{"event":"message","data":{"chat_id":"x","text":"yo","sender":"visitor"}}"#;
    let event = decode(frame).unwrap().unwrap();
    assert_eq!(
        event,
        ServerEvent::Message(ChatMessage::new("yo", Sender::Visitor))
    );
}

#[test]
fn decode_history_in_order() {
    let frame = r#"{"event":"chat_history","data":{"messages":[
        {"text":"hi","sender":"agent"},
        {"text":"yo","sender":"visitor"}
    ]}}"#;
    let Some(ServerEvent::ChatHistory { messages }) = decode(frame).unwrap() else {
        panic!("expected history");
    };
    assert_eq!(
        messages,
        vec![
            ChatMessage::new("hi", Sender::Agent),
            ChatMessage::new("yo", Sender::Visitor),
        ]
    );
}

#[test]
fn decode_unknown_event_is_none() {
    let frame = r#"{"event":"new_chat","data":{"chat_id":"x"}}"#;
    assert!(decode(frame).unwrap().is_none());
}

#[test]
fn decode_rejects_non_envelope() {
    let err = decode("not json").unwrap_err();
    assert!(matches!(err, CodecError::Envelope(_)));
}

#[test]
fn decode_rejects_bad_payload() {
    let err = decode(r#"{"event":"message","data":{"sender":"agent"}}"#).unwrap_err();
    match err {
        CodecError::Payload { event, .. } => assert_eq!(event, "message"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn encode_then_decode_envelope_fields() {
    let frame = encode(&ClientEvent::Join {
        chat_id: "abc123".into(),
        user_type: UserType::Visitor,
    })
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(value["event"], "join");
    assert_eq!(value["data"]["chat_id"], "abc123");
}
