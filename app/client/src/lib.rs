//! Parlor client library — network and storage collaborators for the
//! widget controller: the HTTP session starter, the WebSocket transport,
//! and a file-backed session store.

use anyhow::{Context, Result};
use compact_str::CompactString;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use url::Url;
use widget::WidgetEvent;

pub use connection::WsTransport;
pub use starter::HttpStarter;
pub use store::FileStore;

pub mod connection;
pub mod starter;
pub mod store;

/// Client configuration for reaching a chat backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base HTTP URL of the chat backend.
    pub server_url: CompactString,
    /// Delay between reconnection attempts.
    pub reconnect_delay: Duration,
    /// Give up after this many consecutive failed attempts. `None` retries forever.
    pub max_reconnect_attempts: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: CompactString::from("http://127.0.0.1:5000"),
            reconnect_delay: Duration::from_secs(1),
            max_reconnect_attempts: None,
        }
    }
}

impl ClientConfig {
    /// Full URL of the session-start endpoint.
    pub fn start_url(&self) -> Result<String> {
        let url = self.base()?.join(protocol::START_CHAT_PATH)?;
        Ok(url.into())
    }

    /// WebSocket URL of the realtime endpoint (`http` → `ws`, `https` → `wss`).
    pub fn realtime_url(&self) -> Result<String> {
        let mut url = self.base()?.join(protocol::REALTIME_PATH)?;
        let scheme = match url.scheme() {
            "https" | "wss" => "wss",
            _ => "ws",
        };
        url.set_scheme(scheme)
            .map_err(|_| anyhow::anyhow!("cannot use {scheme} for {url}"))?;
        Ok(url.into())
    }

    fn base(&self) -> Result<Url> {
        Url::parse(&self.server_url).with_context(|| format!("invalid server url {}", self.server_url))
    }
}

/// Builds the network collaborators for one widget.
///
/// Both collaborators report back on the same event queue so the
/// controller sees every completion in receipt order.
pub struct ParlorClient {
    config: ClientConfig,
}

impl ParlorClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Access the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Set the backend URL.
    pub fn server_url(mut self, url: impl Into<CompactString>) -> Self {
        self.config.server_url = url.into();
        self
    }

    /// Set the delay between reconnection attempts.
    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.config.reconnect_delay = delay;
        self
    }

    /// Cap consecutive reconnection attempts.
    pub fn max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.config.max_reconnect_attempts = Some(attempts);
        self
    }

    /// Build the session starter.
    pub fn starter(&self, events: UnboundedSender<WidgetEvent>) -> Result<HttpStarter> {
        Ok(HttpStarter::new(self.config.start_url()?, events))
    }

    /// Build the realtime transport. Nothing connects until the controller asks.
    pub fn transport(&self, events: UnboundedSender<WidgetEvent>) -> Result<WsTransport> {
        Ok(WsTransport::new(
            self.config.realtime_url()?,
            self.config.reconnect_delay,
            self.config.max_reconnect_attempts,
            events,
        ))
    }
}
