//! Terminal and JSON output

use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::core::Status;
use crate::error::Result;

/// Writes command results either as coloured text or as JSON
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    json: bool,
}

impl OutputFormatter {
    #[must_use]
    pub fn new(json: bool, no_color: bool) -> Self {
        if no_color || std::env::var_os("NO_COLOR").is_some() {
            colored::control::set_override(false);
        }
        Self { json }
    }

    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.json
    }

    /// Print a success message (suppressed in JSON mode)
    pub fn success(&self, message: &str) {
        if !self.json {
            println!("{} {message}", "✓".green().bold());
        }
    }

    /// Print an informational line (suppressed in JSON mode)
    pub fn info(&self, message: &str) {
        if !self.json {
            println!("{message}");
        }
    }

    pub fn warning(&self, message: &str) {
        if !self.json {
            eprintln!("{} {message}", "warning:".yellow().bold());
        }
    }

    pub fn error(&self, message: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {message}", "error:".red().bold());
    }

    /// Print any serializable value as pretty JSON
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Status label coloured by how much attention it needs
    #[must_use]
    pub fn status(status: Status) -> ColoredString {
        let label = status.to_string();
        match status {
            Status::Opened => label.blue().bold(),
            Status::Reopened => label.magenta().bold(),
            Status::Resolved => label.green(),
            Status::PendingClosure => label.yellow(),
            Status::Closed => label.dimmed(),
        }
    }
}
