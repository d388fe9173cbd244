//! WebSocket transport to the chat backend.
//!
//! One background task owns the socket. It reconnects on its own after a
//! drop, buffers outgoing frames while the link is down, and reports every
//! (re)connection, drop and inbound event to the widget's event queue.

use anyhow::{Result, anyhow, bail};
use futures_util::{SinkExt, StreamExt};
use protocol::{ClientEvent, codec};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use widget::{Transport, TransportEvent, WidgetEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Instruction from the widget to the socket task.
enum Command {
    Emit(String),
    Close,
}

/// How a live link ended.
enum LinkEnd {
    /// The server or network dropped the link; reconnect.
    Dropped,
    /// The widget asked to close or went away; stop.
    Closed,
}

/// Realtime transport over a WebSocket carrying JSON event envelopes.
///
/// Not Clone — one transport per widget.
pub struct WsTransport {
    url: String,
    reconnect_delay: Duration,
    max_attempts: Option<u32>,
    events: UnboundedSender<WidgetEvent>,
    commands: Option<UnboundedSender<Command>>,
}

impl WsTransport {
    /// Create a transport for `url`. Nothing connects until [`Transport::connect`].
    pub fn new(
        url: impl Into<String>,
        reconnect_delay: Duration,
        max_attempts: Option<u32>,
        events: UnboundedSender<WidgetEvent>,
    ) -> Self {
        Self {
            url: url.into(),
            reconnect_delay,
            max_attempts,
            events,
            commands: None,
        }
    }

    /// WebSocket URL this transport connects to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the socket task has been started and not closed.
    pub fn is_open(&self) -> bool {
        self.commands.as_ref().is_some_and(|tx| !tx.is_closed())
    }
}

impl Transport for WsTransport {
    fn connect(&mut self, join: ClientEvent) {
        if self.commands.is_some() {
            return;
        }
        let join = match codec::encode(&join) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("failed to encode join frame: {e}");
                return;
            }
        };
        let (tx, rx) = mpsc::unbounded_channel();
        self.commands = Some(tx);
        tokio::spawn(run(
            self.url.clone(),
            self.reconnect_delay,
            self.max_attempts,
            join,
            rx,
            self.events.clone(),
        ));
    }

    fn emit(&mut self, event: ClientEvent) -> Result<()> {
        let Some(commands) = &self.commands else {
            bail!("transport is not connected");
        };
        let frame = codec::encode(&event).map_err(|e| anyhow!("{e}"))?;
        commands
            .send(Command::Emit(frame))
            .map_err(|_| anyhow!("transport closed"))
    }

    fn disconnect(&mut self) {
        if let Some(commands) = self.commands.take() {
            let _ = commands.send(Command::Close);
        }
    }
}

/// Socket task: connect, pump, reconnect until closed or out of attempts.
///
/// `join` is re-sent first on each new link.
async fn run(
    url: String,
    delay: Duration,
    max_attempts: Option<u32>,
    join: String,
    mut commands: UnboundedReceiver<Command>,
    events: UnboundedSender<WidgetEvent>,
) {
    let mut backlog = VecDeque::new();
    let mut failures = 0u32;

    loop {
        match connect_async(url.as_str()).await {
            Ok((ws, _)) => {
                failures = 0;
                tracing::debug!("connected to {url}");
                if events.send(TransportEvent::Connected.into()).is_err() {
                    return;
                }
                let end = pump(ws, &join, &mut backlog, &mut commands, &events).await;
                let _ = events.send(TransportEvent::Disconnected.into());
                if let LinkEnd::Closed = end {
                    return;
                }
            }
            Err(e) => {
                tracing::warn!("failed to connect to {url}: {e}");
                if events.send(TransportEvent::Error(e.to_string()).into()).is_err() {
                    return;
                }
            }
        }

        failures += 1;
        if max_attempts.is_some_and(|max| failures > max) {
            tracing::warn!("giving up on {url} after {max_attempts:?} attempts");
            return;
        }

        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => break,
                cmd = commands.recv() => match cmd {
                    Some(Command::Emit(frame)) => backlog.push_back(frame),
                    Some(Command::Close) | None => return,
                },
            }
        }
    }
}

/// Drive one live link until it drops or the widget closes it.
async fn pump(
    ws: WsStream,
    join: &str,
    backlog: &mut VecDeque<String>,
    commands: &mut UnboundedReceiver<Command>,
    events: &UnboundedSender<WidgetEvent>,
) -> LinkEnd {
    let (mut sink, mut stream) = ws.split();

    // Join precedes everything else on every link.
    if sink.send(Message::Text(join.to_owned().into())).await.is_err() {
        return LinkEnd::Dropped;
    }

    // Buffered frames are sent once; a failure here drops them.
    while let Some(frame) = backlog.pop_front() {
        if sink.send(Message::Text(frame.into())).await.is_err() {
            backlog.clear();
            return LinkEnd::Dropped;
        }
    }

    loop {
        tokio::select! {
            cmd = commands.recv() => match cmd {
                Some(Command::Emit(frame)) => {
                    if sink.send(Message::Text(frame.into())).await.is_err() {
                        return LinkEnd::Dropped;
                    }
                }
                Some(Command::Close) | None => {
                    let _ = sink.send(Message::Close(None)).await;
                    return LinkEnd::Closed;
                }
            },
            msg = stream.next() => match msg {
                Some(Ok(Message::Text(text))) => match codec::decode(text.as_str()) {
                    Ok(Some(event)) => {
                        if events.send(TransportEvent::from(event).into()).is_err() {
                            return LinkEnd::Closed;
                        }
                    }
                    Ok(None) => tracing::debug!("ignoring unknown event"),
                    Err(e) => tracing::warn!("dropping malformed frame: {e}"),
                },
                Some(Ok(Message::Close(_))) | None => return LinkEnd::Dropped,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    let _ = events.send(TransportEvent::Error(e.to_string()).into());
                    return LinkEnd::Dropped;
                }
            },
        }
    }
}
