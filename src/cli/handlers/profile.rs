//! Handlers for `login`, `logout` and `whoami`

use dialoguer::{Input, theme::ColorfulTheme};
use std::io::IsTerminal;

use super::common::profile_identity;
use crate::cli::OutputFormatter;
use crate::error::{HelpdeskError, Result};
use crate::identity::{Profile, validate_email};

/// Create the local profile, prompting for whatever was not given
pub async fn handle_login(
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let provider = profile_identity(project_dir)?;
    let interactive = std::io::stdin().is_terminal() && !output.is_json();
    let theme = ColorfulTheme::default();

    let name = match name {
        Some(name) => name,
        None if interactive => Input::<String>::with_theme(&theme)
            .with_prompt("Name")
            .interact_text()?,
        None => return Err(HelpdeskError::validation("name", "Please enter your name")),
    };
    let email = match email {
        Some(email) => email,
        None if interactive => Input::<String>::with_theme(&theme)
            .with_prompt("Email")
            .validate_with(|input: &String| {
                validate_email(input).map_err(|e| e.user_message())
            })
            .interact_text()?,
        None => {
            return Err(HelpdeskError::validation(
                "email",
                "Please enter a valid email address",
            ));
        },
    };
    let phone = match phone {
        Some(phone) => Some(phone),
        None if interactive => Some(
            Input::<String>::with_theme(&theme)
                .with_prompt("Phone (optional)")
                .allow_empty(true)
                .interact_text()?,
        ),
        None => None,
    };

    let profile = Profile::create(name, email, phone, chrono::Utc::now())?;
    provider.save(&profile).await?;

    if output.is_json() {
        output.print_json(&serde_json::json!({
            "status": "success",
            "profile": profile,
        }))?;
    } else {
        output.success(&format!("Signed in as {} <{}>", profile.name, profile.email));
        output.info(&format!("Account: {}", profile.account_id));
    }
    Ok(())
}

pub async fn handle_logout(project_dir: Option<&str>, output: &OutputFormatter) -> Result<()> {
    let removed = profile_identity(project_dir)?.clear().await?;

    if output.is_json() {
        output.print_json(&serde_json::json!({ "signed_out": removed }))?;
    } else if removed {
        output.success("Signed out");
    } else {
        output.info("Not signed in");
    }
    Ok(())
}

pub async fn handle_whoami(project_dir: Option<&str>, output: &OutputFormatter) -> Result<()> {
    let provider = profile_identity(project_dir)?;
    let profile = provider.load().await?;

    if output.is_json() {
        return output.print_json(&serde_json::json!({ "profile": profile }));
    }
    match profile {
        Some(profile) => {
            output.info(&format!("{} <{}>", profile.name, profile.email));
            if !profile.phone.is_empty() {
                output.info(&format!("Phone:   {}", profile.phone));
            }
            output.info(&format!("Account: {}", profile.account_id));
            output.info(&format!("UID:     {}", profile.uid));
        },
        None => output.info("Not signed in. Run `helpdesk login` to create a profile"),
    }
    Ok(())
}
