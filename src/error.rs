//! Error types for the help-desk crate
//!
//! All fallible operations return [`Result`], whose error type is
//! [`HelpdeskError`]. Variants are grouped by how a caller should react:
//! lifecycle rejections are final, store failures may be retried, and
//! validation failures never reach the store.

use crate::core::{Action, Status};
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, HelpdeskError>;

/// Errors produced by the help-desk service
#[derive(Debug, Error)]
pub enum HelpdeskError {
    /// The requested action is not valid from the ticket's current status
    #[error("Cannot {action} ticket {id}: ticket is {from}")]
    IllegalTransition {
        id: String,
        action: Action,
        from: Status,
    },

    /// Auto-closure requested before the resolution aged past the threshold
    #[error("Ticket {id} is not due for closure yet ({remaining} remaining)")]
    ClosureNotDue { id: String, remaining: String },

    /// Caller-supplied input failed validation
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The document store failed for a reason expected to be temporary
    #[error("Document store temporarily unavailable: {0}")]
    TransientStore(String),

    /// A conditional update lost against a concurrent writer
    #[error("Ticket {id} was modified concurrently (expected revision {expected}, found {actual})")]
    RevisionConflict {
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("Ticket not found: {id}")]
    TicketNotFound { id: String },

    #[error("Ticket already exists: {id}")]
    DuplicateTicket { id: String },

    #[error("No signed-in user")]
    NotAuthenticated,

    #[error("Project not initialized")]
    ProjectNotInitialized,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

impl HelpdeskError {
    /// Create a custom error from any message
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    /// Shorthand for a validation failure
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Whether the failure is expected to go away on retry
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::TransientStore(_) | Self::RevisionConflict { .. } => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }

    /// Whether the user can act on the error (retry or fix input)
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.is_transient()
            || matches!(
                self,
                Self::Validation { .. } | Self::NotAuthenticated | Self::ProjectNotInitialized
            )
    }

    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Whether the error means "nothing there" rather than "something failed"
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::TicketNotFound { .. })
    }

    /// Message shown to CLI users
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::TransientStore(_) | Self::RevisionConflict { .. } => {
                format!("{self}. Please try again.")
            },
            Self::NotAuthenticated => "You must be logged in to submit a ticket".to_string(),
            _ => self.to_string(),
        }
    }

    /// Hints for fixing the error
    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ProjectNotInitialized => {
                vec!["Run 'helpdesk init' to initialize the help desk here".to_string()]
            },
            Self::NotAuthenticated => {
                vec!["Run 'helpdesk login --name <NAME> --email <EMAIL>' first".to_string()]
            },
            Self::TicketNotFound { .. } => vec![
                "Use 'helpdesk list' to see your tickets".to_string(),
                "Tickets can be referenced by ID or by help-desk reference (e.g. HID12345678)"
                    .to_string(),
            ],
            Self::IllegalTransition { action, .. } => vec![format!(
                "'{action}' is only allowed from: {}",
                action
                    .allowed_from()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )],
            Self::Config(_) => {
                vec!["Check .helpdesk/config.yaml and HELPDESK__* environment variables".to_string()]
            },
            _ if self.is_transient() => vec!["Retry the same command".to_string()],
            _ => Vec::new(),
        }
    }
}

impl From<config::ConfigError> for HelpdeskError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<dialoguer::Error> for HelpdeskError {
    fn from(err: dialoguer::Error) -> Self {
        Self::custom(format!("Prompt failed: {err}"))
    }
}
