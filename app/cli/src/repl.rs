//! Interactive chat REPL driving the widget controller.
//!
//! Lines are read on a dedicated thread and funnelled into the same loop
//! that applies transport and session-start events, so the controller only
//! ever sees one input at a time.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::History;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use widget::{
    Renderer, SessionController, SessionStarter, SessionStore, Transport, WidgetError,
    WidgetEvent,
};

/// Whether the REPL keeps running after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading input.
    Continue,
    /// Leave the REPL.
    Quit,
}

/// Progress through the capture form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStep {
    /// Waiting for the visitor's name.
    Name,
    /// Name given, waiting for the optional email.
    Email(String),
}

/// Interactive chat REPL, generic over the controller's collaborators.
pub struct ChatRepl<R, S, T, P> {
    controller: SessionController<R, S, T, P>,
    events: UnboundedReceiver<WidgetEvent>,
    form: FormStep,
}

impl<R, S, T, P> ChatRepl<R, S, T, P>
where
    R: Renderer,
    S: SessionStore,
    T: Transport,
    P: SessionStarter,
{
    /// Create a REPL around a freshly built controller.
    pub fn new(controller: SessionController<R, S, T, P>, events: UnboundedReceiver<WidgetEvent>) -> Self {
        Self {
            controller,
            events,
            form: FormStep::Name,
        }
    }

    /// The controller being driven.
    pub fn controller(&self) -> &SessionController<R, S, T, P> {
        &self.controller
    }

    /// Current capture form step.
    pub fn form(&self) -> &FormStep {
        &self.form
    }

    /// Initialize and open the widget, submitting the form right away when
    /// a name was given on the command line.
    pub fn boot(&mut self, name: Option<String>, email: Option<String>) {
        self.controller.initialize();
        self.controller.open_widget();

        let Some(name) = name else {
            return;
        };
        if self.controller.state().has_session() {
            return;
        }
        let email = email.unwrap_or_default();
        if let Err(e) = self.controller.start_session(&name, &email) {
            tracing::debug!("prefilled form rejected: {e}");
        }
    }

    /// Run the interactive loop until EOF, `/quit` or Ctrl+C.
    pub async fn run(&mut self, name: Option<String>, email: Option<String>) -> Result<()> {
        println!("Parlor chat (/quit to exit, /close to minimize, /open to return)");
        self.boot(name, email);

        let mut lines = spawn_reader(history_file_path());
        loop {
            tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => self.apply(event),
                    None => break,
                },
                line = lines.recv() => match line {
                    Some(line) => {
                        if self.handle_line(&line) == Flow::Quit {
                            break;
                        }
                    }
                    None => break,
                },
                _ = tokio::signal::ctrl_c() => break,
            }
        }

        self.controller.shutdown();
        Ok(())
    }

    /// Apply one asynchronous completion to the controller.
    pub fn apply(&mut self, event: WidgetEvent) {
        match self.controller.handle(event) {
            Ok(()) => {}
            Err(WidgetError::StartFailed(_)) => {
                self.form = FormStep::Name;
                println!("Your name:");
            }
            Err(e) => tracing::debug!("{e}"),
        }
    }

    /// Interpret one line of input.
    pub fn handle_line(&mut self, line: &str) -> Flow {
        match line.trim() {
            "/quit" | "/exit" => return Flow::Quit,
            "/open" => {
                self.controller.open_widget();
                return Flow::Continue;
            }
            "/close" => {
                self.controller.close_widget();
                return Flow::Continue;
            }
            "/status" => {
                self.print_status();
                return Flow::Continue;
            }
            _ => {}
        }

        if !self.controller.is_open() {
            println!("(chat minimized, /open to return)");
            return Flow::Continue;
        }

        if self.controller.state().has_session() {
            self.controller.send_message(line);
            return Flow::Continue;
        }

        if self.controller.is_starting() {
            println!("Starting chat, please wait…");
            return Flow::Continue;
        }

        self.form = match std::mem::replace(&mut self.form, FormStep::Name) {
            FormStep::Name if line.trim().is_empty() => {
                let _ = self.controller.start_session(line, "");
                FormStep::Name
            }
            FormStep::Name => {
                println!("Your email (optional):");
                FormStep::Email(line.trim().to_owned())
            }
            FormStep::Email(name) => {
                if let Err(e) = self.controller.start_session(&name, line) {
                    tracing::debug!("start rejected: {e}");
                }
                FormStep::Name
            }
        };
        Flow::Continue
    }

    fn print_status(&self) {
        println!(
            "state: {:?}, connection: {:?}, chat: {}",
            self.controller.state(),
            self.controller.connection(),
            self.controller.session_id().unwrap_or("-"),
        );
    }
}

/// Resolve the history file path at `~/.config/parlor/history`.
fn history_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("parlor").join("history"))
}

/// Turn one readline result into a line to forward, or `None` to stop
/// reading. Ctrl+C arrives here as [`ReadlineError::Interrupted`] while the
/// editor owns the terminal, so it ends the session like EOF does.
pub fn accept_input(result: Result<String, ReadlineError>) -> Option<String> {
    match result {
        Ok(line) => Some(line),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => None,
        Err(e) => {
            tracing::warn!("readline error: {e}");
            None
        }
    }
}

/// Add a non-blank line to `history` and write it out to `path` right away,
/// so `/quit` and Ctrl+C keep what was typed.
pub fn record_line<H: History>(history: &mut H, path: Option<&Path>, line: &str) {
    if line.trim().is_empty() {
        return;
    }
    if let Err(e) = history.add(line) {
        tracing::debug!("failed to add history entry: {e}");
        return;
    }
    let Some(path) = path else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = history.save(path) {
        tracing::debug!("failed to save history: {e}");
    }
}

/// Read lines on a blocking thread and forward them until EOF or Ctrl+C.
fn spawn_reader(history_path: Option<PathBuf>) -> UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let mut editor = match rustyline::DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                tracing::warn!("failed to open line editor: {e}");
                return;
            }
        };
        if let Some(ref path) = history_path {
            let _ = editor.load_history(path);
        }

        while let Some(line) = accept_input(editor.readline("> ")) {
            record_line(editor.history_mut(), history_path.as_deref(), &line);
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
