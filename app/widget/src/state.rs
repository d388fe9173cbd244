//! Session and connection state.

use compact_str::CompactString;

/// Lifecycle of the visitor's chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No chat has been started on this device.
    NoSession,
    /// The capture form is shown, waiting for the visitor's details.
    AwaitingStart,
    /// A session exists and the transport has not yet confirmed a connection.
    Connecting,
    /// The transport connected at least once for this session.
    Active,
}

impl SessionState {
    /// Whether a session identifier exists in this state.
    pub fn has_session(&self) -> bool {
        matches!(self, Self::Connecting | Self::Active)
    }
}

/// Live state of the realtime link. Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No link, either never opened or dropped and awaiting reconnect.
    #[default]
    Disconnected,
    /// A connection attempt is in progress.
    Connecting,
    /// The link is up.
    Connected,
}

/// Visitor details collected by the capture form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visitor {
    /// Display name, trimmed and non-empty.
    pub name: CompactString,
    /// Email, trimmed; `None` when left blank.
    pub email: Option<CompactString>,
}
