//! Presentation collaborator.

use crate::ConnectionState;
use protocol::ChatMessage;

/// Draws the widget. Purely reactive: the controller calls these methods
/// and the renderer never mutates controller state.
pub trait Renderer {
    /// Reveal the chat window.
    fn show(&mut self);

    /// Hide the chat window.
    fn hide(&mut self);

    /// Show the lead-capture form instead of the conversation.
    fn show_form(&mut self);

    /// Show the conversation view with the current transcript.
    fn show_conversation(&mut self, transcript: &[ChatMessage]);

    /// Append a single message to the conversation view.
    fn append_message(&mut self, message: &ChatMessage);

    /// Redraw the conversation from scratch.
    fn replace_transcript(&mut self, transcript: &[ChatMessage]);

    /// Surface a user-visible error.
    fn show_error(&mut self, message: &str);

    /// Reflect a change of the realtime link.
    fn connection_changed(&mut self, _state: ConnectionState) {}
}
