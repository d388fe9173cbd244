//! Parlor widget core — the chat session lifecycle controller.
//!
//! [`SessionController`] decides whether the visitor sees the lead-capture
//! form or the live conversation, owns the realtime connection, and merges
//! message events into the visible transcript. Presentation, persistence,
//! the realtime channel and the session-start request are collaborators
//! behind the traits in this crate, so the controller runs unchanged in a
//! terminal, a GUI, or a test harness.

pub use config::WidgetConfig;
pub use controller::{SessionController, StartOutcome};
pub use error::{StartError, WidgetError};
pub use protocol::{ChatMessage, Sender};
pub use render::Renderer;
pub use state::{ConnectionState, SessionState, Visitor};
pub use store::{MemoryStore, SessionStore};
pub use transport::{SessionStarter, Transport, TransportEvent, WidgetEvent};

pub mod config;
pub mod controller;
pub mod error;
pub mod render;
pub mod state;
pub mod store;
pub mod transport;
