//! Parlor wire protocol types shared between the chat backend and the widget.
//!
//! Two surfaces are covered: the HTTP session-start exchange
//! (`POST /api/start_chat`) and the named events carried over the realtime
//! transport. Transport events travel as JSON envelopes, see [`codec`].

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

pub mod codec;

/// Path of the session-start endpoint, relative to the server URL.
pub const START_CHAT_PATH: &str = "/api/start_chat";

/// Path of the realtime endpoint, relative to the server URL.
pub const REALTIME_PATH: &str = "/ws";

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The website visitor using the widget.
    Visitor,
    /// A support agent (human or automated).
    Agent,
}

impl Sender {
    /// Wire name of the sender.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visitor => "visitor",
            Self::Agent => "agent",
        }
    }
}

/// Role announced when joining a chat room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// A visitor joining their own chat.
    Visitor,
}

/// A single chat message as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message body.
    pub text: String,
    /// Message author.
    pub sender: Sender,
    /// Server-assigned ISO-8601 timestamp, absent for local messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ChatMessage {
    /// Create a message without a timestamp.
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
            timestamp: None,
        }
    }
}

/// Body of `POST /api/start_chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartChatRequest {
    /// Visitor display name, never blank.
    pub name: String,
    /// Visitor email, empty when not given.
    #[serde(default)]
    pub email: String,
}

/// Successful response of `POST /api/start_chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartChatResponse {
    /// Server-issued chat (session) identifier.
    pub chat_id: CompactString,
}

/// Events emitted by the widget over the realtime transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Join the room of a chat to receive its messages and history.
    Join {
        /// Chat to join.
        chat_id: CompactString,
        /// Role of the joining party.
        user_type: UserType,
    },
    /// A message typed by the visitor.
    Message {
        /// Chat the message belongs to.
        chat_id: CompactString,
        /// Message body.
        message: String,
        /// Always [`Sender::Visitor`] from the widget.
        sender: Sender,
    },
}

/// Events delivered to the widget over the realtime transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A new message in the chat room.
    Message(ChatMessage),
    /// Full history of the chat, sent after a join.
    ChatHistory {
        /// Messages in chronological order.
        messages: Vec<ChatMessage>,
    },
}
