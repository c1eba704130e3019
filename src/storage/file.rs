//! YAML file document store
//!
//! Layout under the help-desk directory:
//!
//! ```text
//! .helpdesk/
//!   tickets/<id>.yaml
//!   locks/<id>.lock
//! ```
//!
//! Writes go to a temporary file and are renamed into place, so readers never
//! observe a half-written ticket.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use super::lock::FileLock;
use super::{DocumentStore, TicketQuery};
use crate::core::{Ticket, TicketId, TicketPatch};
use crate::error::{HelpdeskError, Result};

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// File-backed ticket store
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_dir: PathBuf,
    lock_timeout: Duration,
}

impl FileStorage {
    /// Create a store rooted at `base_dir` (usually `.helpdesk`)
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[must_use]
    pub fn tickets_dir(&self) -> PathBuf {
        self.base_dir.join("tickets")
    }

    fn locks_dir(&self) -> PathBuf {
        self.base_dir.join("locks")
    }

    fn ticket_path(&self, id: &TicketId) -> PathBuf {
        self.tickets_dir().join(format!("{id}.yaml"))
    }

    fn lock_path(&self, id: &TicketId) -> PathBuf {
        self.locks_dir().join(format!("{id}.lock"))
    }

    /// Create the ticket and lock directories
    pub async fn ensure_directories(&self) -> Result<()> {
        tokio::fs::create_dir_all(self.tickets_dir()).await?;
        tokio::fs::create_dir_all(self.locks_dir()).await?;
        Ok(())
    }

    async fn lock(&self, id: &TicketId) -> Result<FileLock> {
        tokio::fs::create_dir_all(self.locks_dir()).await?;
        FileLock::acquire(self.lock_path(id), self.lock_timeout).await
    }

    async fn read_ticket(path: &Path) -> Result<Ticket> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(serde_yaml::from_str(&content)?)
    }

    async fn write_ticket(&self, ticket: &Ticket) -> Result<()> {
        let path = self.ticket_path(&ticket.id);
        let tmp = path.with_extension("yaml.tmp");
        let content = serde_yaml::to_string(ticket)?;
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(ticket = %ticket.display_ref(), revision = ticket.revision, "ticket written");
        Ok(())
    }

    /// Load a single ticket
    pub async fn load_ticket(&self, id: &TicketId) -> Result<Ticket> {
        let path = self.ticket_path(id);
        match Self::read_ticket(&path).await {
            Err(HelpdeskError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(HelpdeskError::TicketNotFound { id: id.to_string() })
            },
            other => other,
        }
    }

    /// Load every readable ticket; unreadable documents are skipped with a warning
    pub async fn load_all_tickets(&self) -> Result<Vec<Ticket>> {
        let dir = self.tickets_dir();
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(HelpdeskError::ProjectNotInitialized);
            },
            Err(e) => return Err(e.into()),
        };

        let mut tickets = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            match Self::read_ticket(&path).await {
                Ok(ticket) => tickets.push(ticket),
                Err(HelpdeskError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {},
                Err(e) => warn!(file = %path.display(), error = %e, "skipping unreadable ticket"),
            }
        }
        Ok(tickets)
    }
}

#[async_trait]
impl DocumentStore for FileStorage {
    async fn create(&self, ticket: &Ticket) -> Result<()> {
        let _lock = self.lock(&ticket.id).await?;
        if tokio::fs::try_exists(self.ticket_path(&ticket.id)).await? {
            return Err(HelpdeskError::DuplicateTicket {
                id: ticket.id.to_string(),
            });
        }
        self.write_ticket(ticket).await
    }

    async fn get(&self, id: &TicketId) -> Result<Ticket> {
        self.load_ticket(id).await
    }

    async fn update_fields(
        &self,
        id: &TicketId,
        expected_revision: u64,
        patch: &TicketPatch,
    ) -> Result<Ticket> {
        let _lock = self.lock(id).await?;
        let mut ticket = self.load_ticket(id).await?;

        if ticket.revision != expected_revision {
            return Err(HelpdeskError::RevisionConflict {
                id: ticket.display_ref(),
                expected: expected_revision,
                actual: ticket.revision,
            });
        }

        ticket.apply(patch);
        ticket.revision += 1;
        self.write_ticket(&ticket).await?;
        Ok(ticket)
    }

    async fn query(&self, query: &TicketQuery) -> Result<Vec<Ticket>> {
        let tickets = self.load_all_tickets().await?;
        Ok(query.apply(tickets))
    }
}
