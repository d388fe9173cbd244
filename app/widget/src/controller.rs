//! Session lifecycle controller.
//!
//! State machine:
//!
//! ```text
//! NoSession --open--> AwaitingStart --start ok--> Connecting --connected--> Active
//!                          ^   |
//!                          +---+ start failed (retryable)
//! ```
//!
//! A persisted chat id skips straight to `Connecting` on [`SessionController::initialize`].
//! Once a session exists it is never downgraded; transport drops only change
//! the [`ConnectionState`].

use crate::{
    ConnectionState, Renderer, SessionStarter, SessionState, SessionStore, StartError,
    Transport, TransportEvent, Visitor, WidgetConfig, WidgetError, WidgetEvent,
};
use compact_str::CompactString;
use protocol::{ChatMessage, ClientEvent, Sender, StartChatRequest, UserType};

/// Message shown when the capture form is submitted without a name.
const NAME_REQUIRED: &str = "Please enter your name";

/// Message shown when the backend refuses to start a chat.
const START_FAILED: &str = "Failed to start chat. Please try again.";

/// Result of a [`SessionController::start_session`] call that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A session-start request was dispatched.
    Requested,
    /// A request is already in flight; this submission was coalesced into it.
    Pending,
    /// A session already exists; nothing was sent.
    AlreadyStarted,
}

/// Owns session identity, the realtime connection, and the transcript.
///
/// All mutation goes through `&mut self`, so the controller is driven from a
/// single task: user actions call the operation methods directly, and
/// asynchronous completions are fed to [`SessionController::handle`] in the
/// order they were received.
pub struct SessionController<R, S, T, P> {
    config: WidgetConfig,
    renderer: R,
    store: S,
    transport: T,
    starter: P,
    state: SessionState,
    connection: ConnectionState,
    session_id: Option<CompactString>,
    visitor: Option<Visitor>,
    pending: Option<Visitor>,
    transcript: Vec<ChatMessage>,
    open: bool,
    transport_opened: bool,
}

impl<R, S, T, P> SessionController<R, S, T, P>
where
    R: Renderer,
    S: SessionStore,
    T: Transport,
    P: SessionStarter,
{
    /// Create a controller. Nothing is loaded or connected until
    /// [`SessionController::initialize`] is called.
    pub fn new(config: WidgetConfig, renderer: R, store: S, transport: T, starter: P) -> Self {
        Self {
            config,
            renderer,
            store,
            transport,
            starter,
            state: SessionState::NoSession,
            connection: ConnectionState::Disconnected,
            session_id: None,
            visitor: None,
            pending: None,
            transcript: Vec::new(),
            open: false,
            transport_opened: false,
        }
    }

    /// Load a previously persisted session and, if there is one, start
    /// connecting right away.
    pub fn initialize(&mut self) {
        let stored = match self.store.get(&self.config.storage_key) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("failed to read stored session: {e:#}");
                None
            }
        };

        match stored.filter(|id| !id.is_empty()) {
            Some(id) => {
                tracing::debug!("resuming chat {id}");
                self.session_id = Some(CompactString::from(id));
                self.state = SessionState::Connecting;
                self.ensure_connected();
            }
            None => self.state = SessionState::NoSession,
        }
    }

    /// Show the widget. Idempotent while already open.
    pub fn open_widget(&mut self) {
        if self.open {
            return;
        }
        self.open = true;
        self.renderer.show();

        if self.state.has_session() {
            self.renderer.show_conversation(&self.transcript);
            self.ensure_connected();
        } else {
            self.state = SessionState::AwaitingStart;
            self.renderer.show_form();
        }
    }

    /// Hide the widget. The chat stays live in the background.
    pub fn close_widget(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.renderer.hide();
    }

    /// Open the widget if closed, close it if open.
    pub fn toggle_widget(&mut self) {
        if self.open {
            self.close_widget();
        } else {
            self.open_widget();
        }
    }

    /// Submit the capture form.
    ///
    /// Blank names are rejected locally without a request. Only one
    /// session-start request may be outstanding; the result arrives later
    /// as [`WidgetEvent::Started`].
    pub fn start_session(&mut self, name: &str, email: &str) -> Result<StartOutcome, WidgetError> {
        if self.state.has_session() {
            return Ok(StartOutcome::AlreadyStarted);
        }

        let name = name.trim();
        if name.is_empty() {
            self.renderer.show_error(NAME_REQUIRED);
            return Err(WidgetError::Validation("name is required".to_owned()));
        }

        if self.pending.is_some() {
            tracing::debug!("session start already in flight, ignoring submission");
            return Ok(StartOutcome::Pending);
        }

        let email = email.trim();
        self.pending = Some(Visitor {
            name: name.into(),
            email: (!email.is_empty()).then(|| email.into()),
        });
        self.starter.start(StartChatRequest {
            name: name.to_owned(),
            email: email.to_owned(),
        });
        Ok(StartOutcome::Requested)
    }

    /// Send a visitor message.
    ///
    /// The message is echoed into the transcript immediately and forwarded
    /// without waiting for acknowledgment. Returns `false` and does nothing
    /// for blank text or when there is no session or transport yet.
    pub fn send_message(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() || !self.transport_opened {
            return false;
        }
        let Some(chat_id) = self.session_id.clone() else {
            return false;
        };

        self.push_message(ChatMessage::new(text, Sender::Visitor));
        let event = ClientEvent::Message {
            chat_id,
            message: text.to_owned(),
            sender: Sender::Visitor,
        };
        if let Err(e) = self.transport.emit(event) {
            tracing::warn!("failed to forward message: {e:#}");
        }
        true
    }

    /// Apply an asynchronous completion.
    ///
    /// Errors are returned for the caller to observe; the controller has
    /// already handled them and remains usable.
    pub fn handle(&mut self, event: WidgetEvent) -> Result<(), WidgetError> {
        match event {
            WidgetEvent::Started(result) => self.on_started(result),
            WidgetEvent::Transport(event) => self.on_transport_event(event),
        }
    }

    fn on_started(&mut self, result: Result<CompactString, StartError>) -> Result<(), WidgetError> {
        let Some(visitor) = self.pending.take() else {
            tracing::debug!("ignoring session start result with no request in flight");
            return Ok(());
        };

        let chat_id = match result {
            Ok(chat_id) => chat_id,
            Err(e) => {
                tracing::warn!("error starting chat: {e}");
                self.renderer.show_error(START_FAILED);
                return Err(e.into());
            }
        };

        if let Err(e) = self.store.set(&self.config.storage_key, &chat_id) {
            tracing::warn!("failed to persist chat id: {e:#}");
        }
        tracing::info!("started chat {chat_id}");

        self.session_id = Some(chat_id);
        self.visitor = Some(visitor);
        self.state = SessionState::Connecting;
        if self.open {
            self.renderer.show_conversation(&self.transcript);
        }
        self.ensure_connected();

        let welcome = ChatMessage::new(self.config.welcome_message.clone(), Sender::Agent);
        self.push_message(welcome);
        Ok(())
    }

    fn on_transport_event(&mut self, event: TransportEvent) -> Result<(), WidgetError> {
        match event {
            TransportEvent::Connected => {
                tracing::info!("connected to chat server");
                self.set_connection(ConnectionState::Connected);
                if self.state == SessionState::Connecting {
                    self.state = SessionState::Active;
                }
            }
            TransportEvent::Disconnected => {
                tracing::info!("disconnected from chat server");
                self.set_connection(ConnectionState::Disconnected);
            }
            TransportEvent::Message(message) => match message.sender {
                Sender::Agent => self.push_message(message),
                Sender::Visitor => tracing::debug!("skipping echo of visitor message"),
            },
            TransportEvent::History(messages) => {
                tracing::debug!("replaying {} messages of history", messages.len());
                self.transcript = messages;
                self.renderer.replace_transcript(&self.transcript);
            }
            TransportEvent::Error(message) => {
                tracing::warn!("transport error: {message}");
                return Err(WidgetError::Transport(message));
            }
        }
        Ok(())
    }

    fn ensure_connected(&mut self) {
        if self.transport_opened {
            return;
        }
        let Some(chat_id) = self.session_id.clone() else {
            return;
        };
        self.transport_opened = true;
        self.set_connection(ConnectionState::Connecting);
        self.transport.connect(ClientEvent::Join {
            chat_id,
            user_type: UserType::Visitor,
        });
    }

    fn set_connection(&mut self, state: ConnectionState) {
        if self.connection != state {
            self.connection = state;
            self.renderer.connection_changed(state);
        }
    }

    fn push_message(&mut self, message: ChatMessage) {
        self.renderer.append_message(&message);
        self.transcript.push(message);
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current realtime link state.
    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// Server-issued chat id, if a session exists.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Visitor details collected in this page lifetime.
    pub fn visitor(&self) -> Option<&Visitor> {
        self.visitor.as_ref()
    }

    /// Whether a session-start request is in flight.
    pub fn is_starting(&self) -> bool {
        self.pending.is_some()
    }

    /// Messages currently displayed, oldest first.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Whether the widget window is shown.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Widget settings.
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The session store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The session starter.
    pub fn starter(&self) -> &P {
        &self.starter
    }

    /// Close the transport. Used when the embedding page goes away.
    pub fn shutdown(&mut self) {
        if self.transport_opened {
            self.transport.disconnect();
        }
    }
}
