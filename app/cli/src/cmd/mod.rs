//! CLI argument parsing and subcommand dispatch.

use crate::prefs::CliPrefs;
use anyhow::Result;
use clap::{Parser, Subcommand};
use client::FileStore;
use std::path::PathBuf;
use widget::SessionStore;

pub mod chat;
pub mod config;

/// Talk to a support team from the terminal.
#[derive(Parser, Debug)]
#[command(name = "parlor", about = "Parlor support chat")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Chat backend URL override.
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Session storage file override.
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the chat widget.
    Chat(chat::Chat),
    /// Print the persisted chat id.
    Session,
    /// Manage CLI preferences.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

/// Preference management subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current preferences.
    Show,
    /// Set a preference value.
    Set {
        /// Preference key.
        key: String,
        /// Preference value.
        value: String,
    },
}

impl Cli {
    /// Run the selected subcommand.
    pub async fn run(self) -> Result<()> {
        let prefs = CliPrefs::load()?;
        let store = match self.storage {
            Some(path) => FileStore::new(path),
            None => FileStore::open_default(),
        };

        match self.command {
            Command::Chat(chat) => chat.run(&prefs, self.server.as_deref(), store).await,
            Command::Session => {
                let key = prefs.widget_config().storage_key;
                match store.get(&key)? {
                    Some(id) if !id.is_empty() => println!("{id}"),
                    _ => println!("No chat started ({})", store.path().display()),
                }
                Ok(())
            }
            Command::Config { action } => config::run(&action),
        }
    }
}
