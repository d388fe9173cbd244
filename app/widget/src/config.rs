//! Widget presentation and storage settings.

use serde::{Deserialize, Serialize};

/// Default local-storage key holding the chat id.
pub const DEFAULT_STORAGE_KEY: &str = "parlor-chat-id";

/// Settings for one embedded widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Header shown above the conversation.
    pub title: String,
    /// Synthetic agent message appended after a chat starts.
    pub welcome_message: String,
    /// Key under which the chat id is persisted.
    pub storage_key: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            title: "Chat with Us".to_owned(),
            welcome_message: "Welcome to our support! How can we help you today?".to_owned(),
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
        }
    }
}
