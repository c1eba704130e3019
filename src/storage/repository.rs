use async_trait::async_trait;

use super::TicketQuery;
use crate::core::{Ticket, TicketId, TicketPatch};
use crate::error::Result;

/// Document store for help-desk tickets
///
/// One document per ticket. Implementations must apply
/// [`update_fields`](DocumentStore::update_fields) atomically: check the
/// revision, apply the patch and bump the revision as one step, so concurrent
/// writers to the same ticket are serialized.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores a new ticket; fails with `DuplicateTicket` if the id exists
    async fn create(&self, ticket: &Ticket) -> Result<()>;

    /// Loads a ticket by ID
    async fn get(&self, id: &TicketId) -> Result<Ticket>;

    /// Applies `patch` if the stored revision equals `expected_revision`
    ///
    /// Returns the updated ticket. Fails with `RevisionConflict` when another
    /// writer got there first.
    async fn update_fields(
        &self,
        id: &TicketId,
        expected_revision: u64,
        patch: &TicketPatch,
    ) -> Result<Ticket>;

    /// Runs a query over all tickets
    async fn query(&self, query: &TicketQuery) -> Result<Vec<Ticket>>;

    /// Checks if a ticket exists by ID
    async fn exists(&self, id: &TicketId) -> Result<bool> {
        match self.get(id).await {
            Ok(_) => Ok(true),
            Err(crate::error::HelpdeskError::TicketNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
