//! Interactive chat command.

use crate::prefs::CliPrefs;
use crate::repl::ChatRepl;
use crate::terminal::TerminalRenderer;
use anyhow::Result;
use clap::Args;
use client::{FileStore, ParlorClient};
use tokio::sync::mpsc;
use widget::SessionController;

/// Open the chat widget in the terminal.
#[derive(Args, Debug)]
pub struct Chat {
    /// Pre-fill the name field of the start form.
    #[arg(long)]
    pub name: Option<String>,

    /// Pre-fill the email field of the start form.
    #[arg(long)]
    pub email: Option<String>,
}

impl Chat {
    /// Wire the controller to its collaborators and enter the REPL.
    pub async fn run(self, prefs: &CliPrefs, server: Option<&str>, store: FileStore) -> Result<()> {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = ParlorClient::new(prefs.client_config(server));
        let config = prefs.widget_config();
        let renderer = TerminalRenderer::stdout(config.title.clone());

        let controller = SessionController::new(
            config,
            renderer,
            store,
            client.transport(tx.clone())?,
            client.starter(tx)?,
        );
        let mut repl = ChatRepl::new(controller, rx);
        repl.run(self.name, self.email).await
    }
}
