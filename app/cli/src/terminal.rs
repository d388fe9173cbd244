//! Terminal renderer for the chat widget.

use console::style;
use std::io::{Stdout, Write};
use widget::{ChatMessage, ConnectionState, Renderer, Sender};

/// Prints the widget to a terminal-like writer.
///
/// While hidden, incoming messages are counted instead of printed and the
/// transcript is shown in full when the conversation is revealed again.
pub struct TerminalRenderer<W = Stdout> {
    out: W,
    title: String,
    visible: bool,
    unread: usize,
}

impl TerminalRenderer<Stdout> {
    /// Renderer printing to stdout.
    pub fn stdout(title: impl Into<String>) -> Self {
        Self::new(std::io::stdout(), title)
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Renderer printing to `out`.
    pub fn new(out: W, title: impl Into<String>) -> Self {
        Self {
            out,
            title: title.into(),
            visible: false,
            unread: 0,
        }
    }

    /// Messages received while hidden.
    pub fn unread(&self) -> usize {
        self.unread
    }

    /// Consume the renderer and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl std::fmt::Display) {
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }

    fn print_message(&mut self, message: &ChatMessage) {
        let label = match message.sender {
            Sender::Visitor => style("you").cyan().bold(),
            Sender::Agent => style("agent").green().bold(),
        };
        let line = match &message.timestamp {
            Some(ts) => format!("{label} {} {}", style(ts).dim(), message.text),
            None => format!("{label} {}", message.text),
        };
        self.line(line);
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn show(&mut self) {
        self.visible = true;
        let header = format!("── {} ──", self.title);
        self.line(style(header).bold());
    }

    fn hide(&mut self) {
        self.visible = false;
        self.line(style("(chat minimized, /open to return)").dim());
    }

    fn show_form(&mut self) {
        self.line("Start a chat with our team.");
        self.line("Your name:");
    }

    fn show_conversation(&mut self, transcript: &[ChatMessage]) {
        self.unread = 0;
        for message in transcript {
            self.print_message(message);
        }
    }

    fn append_message(&mut self, message: &ChatMessage) {
        if self.visible {
            self.print_message(message);
        } else {
            self.unread += 1;
        }
    }

    fn replace_transcript(&mut self, transcript: &[ChatMessage]) {
        if !self.visible {
            self.unread = transcript.len();
            return;
        }
        self.line(style("── history ──").dim());
        for message in transcript {
            self.print_message(message);
        }
    }

    fn show_error(&mut self, message: &str) {
        self.line(style(format!("! {message}")).red());
    }

    fn connection_changed(&mut self, state: ConnectionState) {
        let note = match state {
            ConnectionState::Connected => "(connected)",
            ConnectionState::Connecting => "(connecting…)",
            ConnectionState::Disconnected => "(connection lost, reconnecting…)",
        };
        if self.visible {
            self.line(style(note).dim());
        }
    }
}
