//! helpdesk - customer support ticket CLI
//!
//! Parses command-line arguments, installs logging and dispatches to the
//! command handlers.

use clap::Parser;
use helpdesk::cli::handlers::{
    CreateParams, handle_config_show, handle_init, handle_list_command, handle_login,
    handle_logout, handle_new_command, handle_reopen_command, handle_resolve_command,
    handle_show_command, handle_sweep_command, handle_watch_command, handle_whoami,
};
use helpdesk::cli::{Cli, Commands, ConfigCommands, OutputFormatter};
use helpdesk::error::{HelpdeskError, Result};
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let formatter = OutputFormatter::new(cli.json, cli.no_color);

    if let Err(e) = dispatch_command(cli.command, cli.project, &formatter).await {
        handle_error(&e, &formatter);
        process::exit(1);
    }
}

/// Log to stderr; `--verbose` forces debug, otherwise `RUST_LOG` or warnings only
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch_command(
    command: Commands,
    project: Option<String>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let project = project.as_deref();
    match command {
        Commands::Init { name, force } => {
            handle_init(name.as_deref(), force, project, formatter).await
        },
        Commands::Login { name, email, phone } => {
            handle_login(name, email, phone, project, formatter).await
        },
        Commands::Logout => handle_logout(project, formatter).await,
        Commands::Whoami => handle_whoami(project, formatter).await,
        Commands::New {
            category,
            description,
            attachment,
        } => {
            handle_new_command(
                CreateParams {
                    category,
                    description,
                    attachment,
                    project_dir: project.map(str::to_string),
                },
                formatter,
            )
            .await
        },
        Commands::List { all, status, limit } => {
            handle_list_command(all, status, limit, project, formatter).await
        },
        Commands::Show { ticket } => handle_show_command(&ticket, project, formatter).await,
        Commands::Resolve {
            ticket,
            message,
            attachment,
        } => handle_resolve_command(&ticket, message, attachment, project, formatter).await,
        Commands::Reopen {
            ticket,
            message,
            yes,
        } => handle_reopen_command(&ticket, message, yes, project, formatter).await,
        Commands::Sweep => handle_sweep_command(project, formatter).await,
        Commands::Watch { interval } => {
            handle_watch_command(interval.as_deref(), project, formatter).await
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show { key } => handle_config_show(key.as_deref(), project, formatter),
        },
    }
}

/// Print an error with suggestions, or as a JSON object in `--json` mode
fn handle_error(error: &HelpdeskError, formatter: &OutputFormatter) {
    if formatter.is_json() {
        let payload = serde_json::json!({
            "status": "error",
            "error": error.to_string(),
            "message": error.user_message(),
            "recoverable": error.is_recoverable(),
            "suggestions": error.suggestions(),
        });
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
        );
        return;
    }

    formatter.error(&error.user_message());
    let suggestions = error.suggestions();
    if !suggestions.is_empty() {
        eprintln!("\nSuggestions:");
        for suggestion in suggestions {
            eprintln!("  • {suggestion}");
        }
    }
}
