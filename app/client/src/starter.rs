//! Session start over HTTP.

use compact_str::CompactString;
use protocol::{StartChatRequest, StartChatResponse};
use reqwest::Client;
use tokio::sync::mpsc::UnboundedSender;
use widget::{SessionStarter, StartError, WidgetEvent};

/// Posts the capture form to `/api/start_chat` on a background task.
///
/// No timeout beyond reqwest's own is applied.
pub struct HttpStarter {
    client: Client,
    endpoint: String,
    events: UnboundedSender<WidgetEvent>,
}

impl HttpStarter {
    /// Create a starter posting to `endpoint`.
    pub fn new(endpoint: impl Into<String>, events: UnboundedSender<WidgetEvent>) -> Self {
        Self::with_client(Client::new(), endpoint, events)
    }

    /// Create with a custom reqwest client.
    pub fn with_client(
        client: Client,
        endpoint: impl Into<String>,
        events: UnboundedSender<WidgetEvent>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            events,
        }
    }
}

impl SessionStarter for HttpStarter {
    fn start(&mut self, request: StartChatRequest) {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = request_start(&client, &endpoint, &request).await;
            if events.send(WidgetEvent::Started(result)).is_err() {
                tracing::debug!("widget gone before session start finished");
            }
        });
    }
}

/// Perform one session-start request and return the issued chat id.
pub async fn request_start(
    client: &Client,
    endpoint: &str,
    request: &StartChatRequest,
) -> Result<CompactString, StartError> {
    tracing::debug!("starting chat at {endpoint}");
    let response = client
        .post(endpoint)
        .json(request)
        .send()
        .await
        .map_err(|e| StartError::Request(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(StartError::Status(status.as_u16()));
    }

    let body: StartChatResponse = response
        .json()
        .await
        .map_err(|e| StartError::Response(e.to_string()))?;
    if body.chat_id.is_empty() {
        return Err(StartError::Response("empty chat_id".to_owned()));
    }
    Ok(body.chat_id)
}
