//! CLI preferences stored at `~/.config/parlor/cli.toml`.
//!
//! Holds the backend URL and the widget texts. The chat id itself lives in
//! the session storage file, not here.

use anyhow::{Context, Result};
use client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use widget::WidgetConfig;

/// Keys accepted by `parlor config set`.
pub const KEYS: &[&str] = &["server_url", "title", "welcome_message"];

/// CLI-specific preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliPrefs {
    /// Chat backend URL.
    pub server_url: Option<String>,
    /// Widget header.
    pub title: Option<String>,
    /// Greeting shown after a chat starts.
    pub welcome_message: Option<String>,
}

impl CliPrefs {
    /// Load preferences from the default path, returning defaults if missing.
    pub fn load() -> Result<Self> {
        let path = Self::path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
    }

    /// Save preferences to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Default path: `~/.config/parlor/cli.toml`.
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("parlor")
            .join("cli.toml")
    }

    /// Set a preference by key. Returns `false` for unknown keys.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let slot = match key {
            "server_url" => &mut self.server_url,
            "title" => &mut self.title,
            "welcome_message" => &mut self.welcome_message,
            _ => return false,
        };
        *slot = Some(value.to_owned());
        true
    }

    /// Client config, with `server` taking precedence over the stored URL.
    pub fn client_config(&self, server: Option<&str>) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(url) = server.or(self.server_url.as_deref()) {
            config.server_url = url.into();
        }
        config
    }

    /// Widget config with stored texts applied over the defaults.
    pub fn widget_config(&self) -> WidgetConfig {
        let mut config = WidgetConfig::default();
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if let Some(welcome) = &self.welcome_message {
            config.welcome_message = welcome.clone();
        }
        config
    }
}
