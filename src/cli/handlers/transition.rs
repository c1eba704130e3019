//! Handlers for `resolve` and `reopen`

use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::io::IsTerminal;

use super::common::{HandlerContext, ticket_json};
use crate::cli::OutputFormatter;
use crate::core::Ticket;
use crate::error::{HelpdeskError, Result};

/// Answer a ticket and mark it resolved
pub async fn handle_resolve_command(
    ticket_ref: &str,
    message: Option<String>,
    attachment: Option<String>,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let ticket = ctx.manager.find(ticket_ref).await?;

    let message = match message {
        Some(message) => message,
        None if std::io::stdin().is_terminal() && !output.is_json() => {
            Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt("Response")
                .interact_text()?
        },
        None => return Err(HelpdeskError::validation("response", "Response is required")),
    };

    let updated = ctx.manager.resolve(&ticket.id, message, attachment).await?;
    report(&updated, &ctx, output, "resolved")
}

/// Reopen a resolved or closed ticket after confirmation
pub async fn handle_reopen_command(
    ticket_ref: &str,
    message: Option<String>,
    yes: bool,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let ticket = ctx.manager.find(ticket_ref).await?;

    let interactive = std::io::stdin().is_terminal() && !output.is_json();
    if !yes && !interactive {
        return Err(HelpdeskError::validation(
            "confirmation",
            "reopening needs confirmation; pass --yes when not running interactively",
        ));
    }
    if !yes
        && !Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Reopen ticket {}? Support will be notified",
                ticket.display_ref()
            ))
            .default(false)
            .interact()?
    {
        output.info("Reopen cancelled");
        return Ok(());
    }

    let updated = ctx.manager.reopen(&ticket.id, message).await?;
    report(&updated, &ctx, output, "reopened")
}

fn report(ticket: &Ticket, ctx: &HandlerContext, output: &OutputFormatter, verb: &str) -> Result<()> {
    if output.is_json() {
        return output.print_json(&ticket_json(ticket, &ctx.manager));
    }
    output.success(&format!("Ticket {} {verb}", ticket.display_ref()));
    if let Some(countdown) = ctx.manager.countdown(ticket) {
        output.info(&countdown.to_string());
    }
    Ok(())
}
