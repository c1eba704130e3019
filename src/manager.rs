//! Ticket lifecycle manager
//!
//! Binds the pure state machine in [`crate::core`] to a document store, an
//! identity provider and a clock. Every transition is one conditional write;
//! when a concurrent writer wins, the transition is re-planned against the
//! fresh document instead of overwriting it.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::config::Config;
use crate::core::{
    ClosureCountdown, Clock, NewTicket, Status, SystemClock, Ticket, TicketId, Transition,
    ValidationRules, closure_note, open_ticket,
};
use crate::core::duration::format_compact;
use crate::error::{HelpdeskError, Result};
use crate::identity::IdentityProvider;
use crate::integration::{IntegrationEvent, IntegrationService};
use crate::storage::{Direction, DocumentStore, Field, RangeOp, TicketQuery};

/// Lifecycle settings the manager enforces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketPolicy {
    pub closure_threshold: Duration,
    pub ticket_id_prefix: String,
    pub max_transition_attempts: u32,
    pub validation: ValidationRules,
}

impl Default for TicketPolicy {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for TicketPolicy {
    fn from(config: &Config) -> Self {
        Self {
            closure_threshold: config.lifecycle.closure_threshold,
            ticket_id_prefix: config.lifecycle.ticket_id_prefix.clone(),
            max_transition_attempts: config.lifecycle.max_transition_attempts.max(1),
            validation: config.validation,
        }
    }
}

/// Owns ticket creation and every status transition
pub struct TicketManager {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    policy: TicketPolicy,
    events: Arc<IntegrationService>,
}

impl std::fmt::Debug for TicketManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketManager")
            .field("policy", &self.policy)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl TicketManager {
    /// Create a manager using the system clock
    pub fn new(store: Arc<dyn DocumentStore>, policy: TicketPolicy) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            policy,
            events: Arc::new(IntegrationService::new()),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_events(mut self, events: Arc<IntegrationService>) -> Self {
        self.events = events;
        self
    }

    #[must_use]
    pub const fn policy(&self) -> &TicketPolicy {
        &self.policy
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Subscribe to lifecycle events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<IntegrationEvent> {
        self.events.subscribe()
    }

    /// Open a new ticket for the current user
    ///
    /// Input is validated before the identity provider or the store is
    /// consulted; a rejected submission writes nothing.
    pub async fn create(
        &self,
        submission: NewTicket,
        identity: &dyn IdentityProvider,
    ) -> Result<Ticket> {
        let submission = submission.validate(&self.policy.validation)?;
        let user = identity
            .current_user()
            .await?
            .ok_or(HelpdeskError::NotAuthenticated)?;

        let ticket = open_ticket(
            submission,
            user.to_owner(),
            &self.policy.ticket_id_prefix,
            self.clock.now(),
        );
        self.store.create(&ticket).await?;
        self.events.notify_ticket_created(&ticket);
        Ok(ticket)
    }

    pub async fn get(&self, id: &TicketId) -> Result<Ticket> {
        self.store.get(id).await
    }

    /// Look a ticket up by UUID or by help-desk reference
    pub async fn find(&self, ticket_ref: &str) -> Result<Ticket> {
        let ticket_ref = ticket_ref.trim();
        if let Ok(id) = TicketId::parse_str(ticket_ref) {
            return self.store.get(&id).await;
        }

        let mut matches: Vec<Ticket> = self
            .store
            .query(&TicketQuery::new().order_by(Field::CreatedAt, Direction::Descending))
            .await?
            .into_iter()
            .filter(|t| t.reference.eq_ignore_ascii_case(ticket_ref))
            .collect();

        match matches.len() {
            0 => Err(HelpdeskError::TicketNotFound {
                id: ticket_ref.to_string(),
            }),
            1 => Ok(matches.remove(0)),
            n => Err(HelpdeskError::custom(format!(
                "Reference {ticket_ref} is ambiguous ({n} tickets); use the ticket ID instead"
            ))),
        }
    }

    /// Tickets submitted by `uid`, newest first
    pub async fn list_for_owner(&self, uid: &str) -> Result<Vec<Ticket>> {
        self.store
            .query(
                &TicketQuery::new()
                    .where_eq(Field::OwnerUid, uid)
                    .order_by(Field::CreatedAt, Direction::Descending),
            )
            .await
    }

    pub async fn list(&self, query: &TicketQuery) -> Result<Vec<Ticket>> {
        self.store.query(query).await
    }

    /// Resolved tickets whose resolution is at least the closure threshold old
    pub async fn due_for_closure(&self) -> Result<Vec<Ticket>> {
        let threshold = self.policy.closure_threshold;
        let cutoff = self
            .clock
            .now()
            .checked_sub_signed(threshold)
            .ok_or_else(|| {
                HelpdeskError::Config(format!(
                    "closure threshold {} reaches before the earliest representable time",
                    format_compact(threshold)
                ))
            })?;
        self.store
            .query(
                &TicketQuery::new()
                    .where_eq(Field::Status, Status::Resolved)
                    .where_range(Field::ResolvedAt, RangeOp::Le, cutoff)
                    .order_by(Field::ResolvedAt, Direction::Ascending),
            )
            .await
    }

    /// Answer a ticket (`Opened`/`Reopened` → `Resolved`)
    pub async fn resolve(
        &self,
        id: &TicketId,
        response: impl Into<String>,
        attachment_url: Option<String>,
    ) -> Result<Ticket> {
        self.transition(
            id,
            &Transition::Resolve {
                response: response.into(),
                attachment_url,
            },
        )
        .await
    }

    /// Reopen a ticket (`Resolved`/`Closed` → `Reopened`)
    pub async fn reopen(&self, id: &TicketId, note: Option<String>) -> Result<Ticket> {
        self.transition(id, &Transition::Reopen { note }).await
    }

    /// Commit an aged resolution (`Resolved` → `Closed`)
    pub async fn auto_close(&self, id: &TicketId) -> Result<Ticket> {
        self.transition(
            id,
            &Transition::AutoClose {
                threshold: self.policy.closure_threshold,
            },
        )
        .await
    }

    /// Display countdown for a resolved ticket
    #[must_use]
    pub fn countdown(&self, ticket: &Ticket) -> Option<ClosureCountdown> {
        ClosureCountdown::for_ticket(ticket, self.policy.closure_threshold, self.clock.now())
    }

    async fn transition(&self, id: &TicketId, transition: &Transition) -> Result<Ticket> {
        transition.validate()?;

        let mut attempt = 1;
        loop {
            let current = self.store.get(id).await?;
            let patch = transition.plan(&current, self.clock.now())?;

            match self.store.update_fields(id, current.revision, &patch).await {
                Ok(updated) => {
                    self.publish(&updated, current.status);
                    return Ok(updated);
                },
                Err(HelpdeskError::RevisionConflict { .. })
                    if attempt < self.policy.max_transition_attempts =>
                {
                    debug!(
                        ticket = %current.display_ref(),
                        action = %transition.action(),
                        attempt,
                        "concurrent update, re-planning transition"
                    );
                    attempt += 1;
                },
                Err(e) => return Err(e),
            }
        }
    }

    fn publish(&self, ticket: &Ticket, old_status: Status) {
        self.events.notify_status_changed(ticket, old_status);
        if ticket.status == Status::Closed {
            info!(ticket = %ticket.display_ref(), "resolution committed");
            self.events
                .notify_ticket_closed(ticket, closure_note(self.policy.closure_threshold));
        }
    }
}
