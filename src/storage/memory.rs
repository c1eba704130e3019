//! In-process document store

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{DocumentStore, TicketQuery};
use crate::core::{Ticket, TicketId, TicketPatch};
use crate::error::{HelpdeskError, Result};

/// Document store keeping tickets in memory
///
/// Used for embedding and tests. The write lock serializes updates, which
/// gives the same per-ticket atomicity as [`super::FileStorage`].
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tickets: RwLock<HashMap<TicketId, Ticket>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tickets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tickets.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStorage {
    async fn create(&self, ticket: &Ticket) -> Result<()> {
        let mut tickets = self.tickets.write().await;
        if tickets.contains_key(&ticket.id) {
            return Err(HelpdeskError::DuplicateTicket {
                id: ticket.id.to_string(),
            });
        }
        tickets.insert(ticket.id.clone(), ticket.clone());
        Ok(())
    }

    async fn get(&self, id: &TicketId) -> Result<Ticket> {
        self.tickets
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| HelpdeskError::TicketNotFound { id: id.to_string() })
    }

    async fn update_fields(
        &self,
        id: &TicketId,
        expected_revision: u64,
        patch: &TicketPatch,
    ) -> Result<Ticket> {
        let mut tickets = self.tickets.write().await;
        let ticket = tickets
            .get_mut(id)
            .ok_or_else(|| HelpdeskError::TicketNotFound { id: id.to_string() })?;

        if ticket.revision != expected_revision {
            return Err(HelpdeskError::RevisionConflict {
                id: ticket.display_ref(),
                expected: expected_revision,
                actual: ticket.revision,
            });
        }

        ticket.apply(patch);
        ticket.revision += 1;
        Ok(ticket.clone())
    }

    async fn query(&self, query: &TicketQuery) -> Result<Vec<Ticket>> {
        let tickets = self.tickets.read().await;
        Ok(query.apply(tickets.values().cloned()))
    }
}
