//! JSON envelope codec for realtime text frames.
//!
//! Wire format: `{"event": "<name>", "data": <payload>}`. Unknown event names
//! decode to `None` so newer servers can add events without breaking older
//! widgets.

use crate::{ChatMessage, ClientEvent, ServerEvent};
use serde::Deserialize;

/// Errors that can occur while encoding or decoding an envelope.
#[derive(Debug)]
pub enum CodecError {
    /// The frame is not a JSON object with an `event` field.
    Envelope(serde_json::Error),
    /// The payload of a known event has the wrong shape.
    Payload {
        /// Event whose payload failed to decode.
        event: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// Serialization of an outgoing event failed.
    Encode(serde_json::Error),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Envelope(e) => write!(f, "invalid envelope: {e}"),
            Self::Payload { event, source } => write!(f, "invalid '{event}' payload: {source}"),
            Self::Encode(e) => write!(f, "encode error: {e}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Envelope(e) | Self::Encode(e) => Some(e),
            Self::Payload { source, .. } => Some(source),
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Deserialize)]
struct HistoryPayload {
    #[serde(default)]
    messages: Vec<ChatMessage>,
}

/// Encode an outgoing event as a text frame.
pub fn encode(event: &ClientEvent) -> Result<String, CodecError> {
    serde_json::to_string(event).map_err(CodecError::Encode)
}

/// Decode a text frame into a server event.
///
/// Returns `Ok(None)` for well-formed envelopes naming an event the widget
/// does not consume.
pub fn decode(frame: &str) -> Result<Option<ServerEvent>, CodecError> {
    let envelope: Envelope = serde_json::from_str(frame).map_err(CodecError::Envelope)?;
    let payload_err = |source| CodecError::Payload {
        event: envelope.event.clone(),
        source,
    };
    let event = match envelope.event.as_str() {
        "message" => {
            let message: ChatMessage =
                serde_json::from_value(envelope.data.clone()).map_err(payload_err)?;
            ServerEvent::Message(message)
        }
        "chat_history" => {
            let history: HistoryPayload =
                serde_json::from_value(envelope.data.clone()).map_err(payload_err)?;
            ServerEvent::ChatHistory {
                messages: history.messages,
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(event))
}
