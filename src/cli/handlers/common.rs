use chrono::{DateTime, Local, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::{HELPDESK_DIR, find_project_root};
use crate::config::Config;
use crate::core::Ticket;
use crate::error::{HelpdeskError, Result};
use crate::identity::ProfileIdentity;
use crate::manager::{TicketManager, TicketPolicy};
use crate::storage::FileStorage;

/// Common context for handlers that work on a project's tickets
pub struct HandlerContext {
    pub project_root: PathBuf,
    pub config: Config,
    pub storage: Arc<FileStorage>,
    pub manager: Arc<TicketManager>,
    pub identity: ProfileIdentity,
}

impl HandlerContext {
    /// Open the project containing `project_dir` (or the current directory)
    pub fn new(project_dir: Option<&str>) -> Result<Self> {
        let project_root = find_project_root(project_dir)?;
        let helpdesk_dir = project_root.join(HELPDESK_DIR);
        let config = Config::load(&helpdesk_dir)?;

        let storage = Arc::new(FileStorage::new(&helpdesk_dir));
        let manager = Arc::new(TicketManager::new(
            storage.clone(),
            TicketPolicy::from(&config),
        ));
        let identity = ProfileIdentity::new(config.profile_path()?);

        Ok(Self {
            project_root,
            config,
            storage,
            manager,
            identity,
        })
    }

    #[must_use]
    pub fn helpdesk_dir(&self) -> PathBuf {
        self.project_root.join(HELPDESK_DIR)
    }
}

/// Configuration for commands that also work outside a project
pub fn load_config(project_dir: Option<&str>) -> Result<Config> {
    match find_project_root(project_dir) {
        Ok(root) => Config::load(&root.join(HELPDESK_DIR)),
        Err(HelpdeskError::ProjectNotInitialized) => Config::load_or_default(None),
        Err(e) => Err(e),
    }
}

/// Profile store honouring the configured location
pub fn profile_identity(project_dir: Option<&str>) -> Result<ProfileIdentity> {
    Ok(ProfileIdentity::new(load_config(project_dir)?.profile_path()?))
}

/// JSON view of a ticket with its derived countdown
pub fn ticket_json(ticket: &Ticket, manager: &TicketManager) -> serde_json::Value {
    serde_json::json!({
        "ticket": ticket,
        "countdown": manager.countdown(ticket).map(|c| serde_json::json!({
            "value": c,
            "display": c.to_string(),
        })),
    })
}

/// Format a timestamp in local time
#[must_use]
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Whether `path` looks like an initialized help desk
#[must_use]
pub fn is_initialized(project_root: &Path) -> bool {
    project_root.join(HELPDESK_DIR).join("tickets").is_dir()
}
