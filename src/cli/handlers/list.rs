//! Handler for the `list` command

use super::common::{HandlerContext, format_datetime, ticket_json};
use crate::cli::OutputFormatter;
use crate::cli::utils::truncate;
use crate::core::{Status, Ticket};
use crate::error::{HelpdeskError, Result};
use crate::identity::IdentityProvider;
use crate::storage::{Direction, Field, TicketQuery};

/// List tickets
///
/// Without `all` only the signed-in user's tickets are listed, newest first.
pub async fn handle_list_command(
    all: bool,
    status: Option<String>,
    limit: Option<usize>,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;

    let mut query = TicketQuery::new().order_by(Field::CreatedAt, Direction::Descending);
    if !all {
        let user = ctx
            .identity
            .current_user()
            .await?
            .ok_or(HelpdeskError::NotAuthenticated)?;
        query = query.where_eq(Field::OwnerUid, user.uid);
    }
    if let Some(status) = status {
        query = query.where_eq(Field::Status, status.parse::<Status>()?);
    }
    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    let tickets = ctx.manager.list(&query).await?;

    if output.is_json() {
        let items: Vec<_> = tickets
            .iter()
            .map(|t| ticket_json(t, &ctx.manager))
            .collect();
        return output.print_json(&serde_json::json!({
            "tickets": items,
            "count": tickets.len(),
        }));
    }

    if tickets.is_empty() {
        output.info("No tickets found");
        return Ok(());
    }
    for ticket in &tickets {
        output.info(&summary_line(ticket, &ctx));
    }
    output.info(&format!("\n{} ticket(s)", tickets.len()));
    Ok(())
}

fn summary_line(ticket: &Ticket, ctx: &HandlerContext) -> String {
    let countdown = ctx
        .manager
        .countdown(ticket)
        .map(|c| format!("  ({c})"))
        .unwrap_or_default();
    format!(
        "{:<12} {:<18} {:<16} {}  {}{}",
        ticket.display_ref(),
        ticket.category.label(),
        OutputFormatter::status(ticket.status),
        format_datetime(ticket.created_at),
        truncate(ticket.description(), 40),
        countdown,
    )
}
