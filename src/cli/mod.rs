//! Command-line interface
//!
//! Argument definitions live in [`commands`], one handler per command in
//! [`handlers`], and all printing goes through [`OutputFormatter`] so every
//! command honours `--json`.

pub mod commands;
pub mod handlers;
pub mod output;
pub mod utils;

pub use commands::{Cli, Commands, ConfigCommands};
pub use output::OutputFormatter;
pub use utils::find_project_root;

/// Directory holding configuration and tickets inside a project
pub const HELPDESK_DIR: &str = ".helpdesk";
