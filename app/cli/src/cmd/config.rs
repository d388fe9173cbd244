//! Preference management commands: show, set.

use crate::cmd::ConfigCommand;
use crate::prefs::{CliPrefs, KEYS};
use anyhow::{Context, Result, bail};

/// Dispatch config management subcommands.
pub fn run(action: &ConfigCommand) -> Result<()> {
    match action {
        ConfigCommand::Show => show(),
        ConfigCommand::Set { key, value } => set(key, value),
    }
}

fn show() -> Result<()> {
    let path = CliPrefs::path();
    if !path.exists() {
        println!("No config file at {}", path.display());
        return Ok(());
    }
    let contents =
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    print!("{contents}");
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut prefs = CliPrefs::load()?;
    if !prefs.set(key, value) {
        bail!("unknown key '{key}' (expected one of: {})", KEYS.join(", "));
    }
    prefs.save()?;
    println!("Set {key} = {value} in {}", CliPrefs::path().display());
    Ok(())
}
