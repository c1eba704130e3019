//! Lifecycle event broadcasting
//!
//! The lifecycle manager publishes an event for every successful write. Any
//! number of listeners (the `watch` command, embedding applications, tests)
//! can subscribe; publishing never blocks and never fails when nobody listens.

use crate::core::{Status, Ticket, TicketId};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 100;

/// Events emitted by the lifecycle manager
#[derive(Debug, Clone)]
pub enum IntegrationEvent {
    TicketCreated {
        ticket: Ticket,
    },
    StatusChanged {
        ticket_id: TicketId,
        reference: String,
        old_status: Status,
        new_status: Status,
    },
    TicketClosed {
        ticket_id: TicketId,
        reference: String,
        message: String,
    },
}

/// Broadcast hub for lifecycle events
pub struct IntegrationService {
    event_sender: broadcast::Sender<IntegrationEvent>,
}

impl std::fmt::Debug for IntegrationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationService")
            .field("subscribers", &self.event_sender.receiver_count())
            .finish()
    }
}

impl Default for IntegrationService {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegrationService {
    /// Create a new integration service
    #[must_use]
    pub fn new() -> Self {
        let (event_sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { event_sender }
    }

    /// Get an event receiver
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<IntegrationEvent> {
        self.event_sender.subscribe()
    }

    /// Notify about a ticket creation
    pub fn notify_ticket_created(&self, ticket: &Ticket) {
        let _ = self.event_sender.send(IntegrationEvent::TicketCreated {
            ticket: ticket.clone(),
        });
        tracing::info!(ticket = %ticket.reference, category = %ticket.category, "ticket created");
    }

    /// Notify about a status change
    pub fn notify_status_changed(&self, ticket: &Ticket, old_status: Status) {
        let _ = self.event_sender.send(IntegrationEvent::StatusChanged {
            ticket_id: ticket.id.clone(),
            reference: ticket.display_ref(),
            old_status,
            new_status: ticket.status,
        });
        tracing::info!(
            ticket = %ticket.display_ref(),
            from = %old_status,
            to = %ticket.status,
            "status changed"
        );
    }

    /// Notify about a ticket closure
    pub fn notify_ticket_closed(&self, ticket: &Ticket, message: String) {
        let _ = self.event_sender.send(IntegrationEvent::TicketClosed {
            ticket_id: ticket.id.clone(),
            reference: ticket.display_ref(),
            message,
        });
        tracing::info!(ticket = %ticket.display_ref(), "ticket closed");
    }
}
