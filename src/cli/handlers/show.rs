//! Handler for the `show` command

use colored::Colorize;

use super::common::{HandlerContext, format_datetime, ticket_json};
use crate::cli::OutputFormatter;
use crate::core::Ticket;
use crate::error::Result;

/// Show one ticket with its response thread
pub async fn handle_show_command(
    ticket_ref: &str,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let ticket = ctx.manager.find(ticket_ref).await?;

    if output.is_json() {
        return output.print_json(&ticket_json(&ticket, &ctx.manager));
    }
    display_ticket(&ticket, &ctx, output);
    Ok(())
}

fn display_ticket(ticket: &Ticket, ctx: &HandlerContext, output: &OutputFormatter) {
    output.info(&format!(
        "{}  {}  {}",
        ticket.display_ref().bold(),
        ticket.category,
        OutputFormatter::status(ticket.status)
    ));
    output.info(&format!("ID:       {}", ticket.id));
    output.info(&format!(
        "Owner:    {} <{}>",
        ticket.owner.name, ticket.owner.email
    ));
    if !ticket.owner.account_id.is_empty() {
        output.info(&format!("Account:  {}", ticket.owner.account_id));
    }
    output.info(&format!("Created:  {}", format_datetime(ticket.created_at)));
    output.info(&format!("Updated:  {}", format_datetime(ticket.updated_at)));
    if let Some(resolved_at) = ticket.resolved_at {
        output.info(&format!("Resolved: {}", format_datetime(resolved_at)));
    }
    if let Some(countdown) = ctx.manager.countdown(ticket) {
        output.info(&countdown.to_string().yellow().to_string());
    }

    output.info("");
    for (kind, entry) in ticket.responses.timeline() {
        output.info(&format!(
            "[{} {}]",
            kind.cyan(),
            format_datetime(entry.created_at).dimmed()
        ));
        for line in entry.response.lines() {
            output.info(&format!("  {line}"));
        }
        if let Some(url) = &entry.attachment_url {
            output.info(&format!("  attachment: {url}"));
        }
    }
}
