use super::{
    Category, FollowUpKind, Owner, Response, Responses, Status, Ticket, TicketId, reference_for,
};
use chrono::{DateTime, Utc};

/// Builder for creating Ticket instances
///
/// Used for fixtures, imports and tests. Production tickets are opened through
/// [`crate::core::open_ticket`], which enforces the initial state.
#[derive(Default)]
pub struct TicketBuilder {
    id: Option<TicketId>,
    reference: Option<String>,
    category: Option<Category>,
    status: Option<Status>,
    owner: Option<Owner>,
    description: Option<String>,
    attachment_url: Option<String>,
    follow_ups: Vec<(FollowUpKind, Response)>,
    created_at: Option<DateTime<Utc>>,
    resolved_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    revision: u64,
}

impl TicketBuilder {
    /// Create a new ticket builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ticket ID
    #[must_use]
    pub const fn id(mut self, id: TicketId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the help-desk reference
    #[must_use]
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    #[must_use]
    pub const fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub const fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn owner(mut self, owner: Owner) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Set the opening description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn attachment_url(mut self, url: impl Into<String>) -> Self {
        self.attachment_url = Some(url.into());
        self
    }

    /// Append a follow-up response
    #[must_use]
    pub fn follow_up(mut self, kind: FollowUpKind, response: Response) -> Self {
        self.follow_ups.push((kind, response));
        self
    }

    /// Set `created_at` timestamp
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Set `resolved_at` timestamp
    #[must_use]
    pub const fn resolved_at(mut self, resolved_at: DateTime<Utc>) -> Self {
        self.resolved_at = Some(resolved_at);
        self
    }

    /// Set `updated_at` timestamp
    #[must_use]
    pub const fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    #[must_use]
    pub const fn revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    /// Build the ticket
    pub fn build(self) -> Ticket {
        let created_at = self.created_at.unwrap_or_else(Utc::now);
        let mut responses = Responses::new(Response::new(
            self.description
                .unwrap_or_else(|| "Ticket description".to_string()),
            self.attachment_url,
            created_at,
        ));
        for (kind, response) in self.follow_ups {
            responses.append(kind, response);
        }

        Ticket {
            id: self.id.unwrap_or_default(),
            reference: self
                .reference
                .unwrap_or_else(|| reference_for("HID", created_at)),
            category: self.category.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            owner: self.owner.unwrap_or_default(),
            responses,
            created_at,
            resolved_at: self.resolved_at,
            updated_at: self.updated_at.unwrap_or(created_at),
            revision: self.revision,
        }
    }
}
