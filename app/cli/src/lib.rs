//! Parlor CLI application — a terminal rendition of the support chat widget.

pub use cmd::{Cli, Command};

pub mod cmd;
pub mod prefs;
pub mod repl;
pub mod terminal;
