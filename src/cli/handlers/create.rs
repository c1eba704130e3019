//! Handler for the `new` command
//!
//! Missing fields are prompted for when running in a terminal. Whatever the
//! source of the input, it goes through the same validation before anything
//! is written.

use dialoguer::{Input, Select, theme::ColorfulTheme};
use std::io::IsTerminal;

use super::common::{HandlerContext, ticket_json};
use crate::cli::OutputFormatter;
use crate::core::{Category, NewTicket};
use crate::error::{HelpdeskError, Result};

/// Parameters for submitting a ticket
pub struct CreateParams {
    pub category: Option<String>,
    pub description: Option<String>,
    pub attachment: Option<String>,
    pub project_dir: Option<String>,
}

pub async fn handle_new_command(params: CreateParams, output: &OutputFormatter) -> Result<()> {
    let ctx = HandlerContext::new(params.project_dir.as_deref())?;
    let interactive = std::io::stdin().is_terminal() && !output.is_json();

    let category = match params.category {
        Some(label) => label.parse::<Category>()?,
        None if interactive => prompt_category()?,
        None => {
            return Err(HelpdeskError::validation(
                "category",
                "Please select a category",
            ));
        },
    };
    let description = match params.description {
        Some(description) => description,
        None if interactive => Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("Describe the problem")
            .interact_text()?,
        None => String::new(),
    };

    let mut submission = NewTicket::new(category, description);
    submission.attachment_url = params.attachment;

    let ticket = ctx.manager.create(submission, &ctx.identity).await?;

    if output.is_json() {
        output.print_json(&ticket_json(&ticket, &ctx.manager))?;
    } else {
        output.success(&format!(
            "Ticket {} submitted ({})",
            ticket.reference, ticket.category
        ));
        output.info(&format!("ID: {}", ticket.id));
    }
    Ok(())
}

fn prompt_category() -> Result<Category> {
    let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Category")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(Category::ALL[index])
}
