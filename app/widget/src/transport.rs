//! Network collaborators and the events they feed back to the controller.
//!
//! Both collaborators are fire-and-forget: calls return immediately and
//! outcomes arrive later as [`WidgetEvent`]s on the controller's event
//! queue, where they are applied in receipt order.

use crate::StartError;
use anyhow::Result;
use compact_str::CompactString;
use protocol::{ChatMessage, ClientEvent, ServerEvent, StartChatRequest};

/// Bidirectional realtime event channel to the chat backend.
///
/// Reconnection after a drop is the transport's own business; it reports
/// each drop and each (re)connection as a [`TransportEvent`].
pub trait Transport {
    /// Open the channel. Called at most once per controller.
    ///
    /// `join` must be the first frame sent on every (re)connection, ahead
    /// of anything emitted while the link was down.
    fn connect(&mut self, join: ClientEvent);

    /// Queue an event for delivery. Delivery is at-most-once.
    fn emit(&mut self, event: ClientEvent) -> Result<()>;

    /// Close the channel and stop reconnecting.
    fn disconnect(&mut self);
}

/// Issues the session-start request.
pub trait SessionStarter {
    /// Dispatch `request`; the result arrives as [`WidgetEvent::Started`].
    fn start(&mut self, request: StartChatRequest);
}

/// Something the transport observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The link is up (first connect or reconnect).
    Connected,
    /// The link dropped.
    Disconnected,
    /// A message arrived.
    Message(ChatMessage),
    /// The server replayed the chat history.
    History(Vec<ChatMessage>),
    /// A connection-level failure.
    Error(String),
}

impl From<ServerEvent> for TransportEvent {
    fn from(event: ServerEvent) -> Self {
        match event {
            ServerEvent::Message(message) => Self::Message(message),
            ServerEvent::ChatHistory { messages } => Self::History(messages),
        }
    }
}

/// An asynchronous completion delivered to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// The session-start request finished.
    Started(Result<CompactString, StartError>),
    /// The transport observed something.
    Transport(TransportEvent),
}

impl From<TransportEvent> for WidgetEvent {
    fn from(event: TransportEvent) -> Self {
        Self::Transport(event)
    }
}
