//! Command handlers, one module per command family

pub mod common;
mod config;
mod create;
mod init;
mod list;
mod profile;
mod show;
mod sweep;
mod transition;

pub use common::HandlerContext;
pub use config::handle_config_show;
pub use create::{CreateParams, handle_new_command};
pub use init::handle_init;
pub use list::handle_list_command;
pub use profile::{handle_login, handle_logout, handle_whoami};
pub use show::handle_show_command;
pub use sweep::{handle_sweep_command, handle_watch_command};
pub use transition::{handle_reopen_command, handle_resolve_command};
