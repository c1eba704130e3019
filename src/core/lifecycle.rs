//! Ticket state machine
//!
//! Transitions are computed, not applied: [`Transition::plan`] checks the
//! ticket's current status and returns a [`TicketPatch`] describing every field
//! the transition touches. Stores apply the whole patch in one conditional
//! write, so a transition lands completely or not at all.

use chrono::{DateTime, Duration, Utc};

use super::duration::format_long;
use super::validation::{normalize_attachment, validate_response};
use super::{
    Action, FollowUpKind, NewTicket, Owner, Response, Responses, Status, Ticket, TicketId,
    reference_for,
};
use crate::error::{HelpdeskError, Result};

/// Note recorded when the submitter reopens without a message
pub const DEFAULT_REOPEN_NOTE: &str = "Ticket reopened by user";

/// How a patch changes `resolved_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedAtUpdate {
    Keep,
    Set(DateTime<Utc>),
    Clear,
}

/// Field-level update produced by one transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketPatch {
    pub status: Status,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: ResolvedAtUpdate,
    pub append: (FollowUpKind, Response),
}

impl Ticket {
    /// Apply a patch in place. The revision is left to the store.
    pub fn apply(&mut self, patch: &TicketPatch) {
        self.status = patch.status;
        self.updated_at = patch.updated_at;
        match patch.resolved_at {
            ResolvedAtUpdate::Keep => {},
            ResolvedAtUpdate::Set(at) => self.resolved_at = Some(at),
            ResolvedAtUpdate::Clear => self.resolved_at = None,
        }
        let (kind, entry) = &patch.append;
        self.responses.append(*kind, entry.clone());
    }
}

/// Build a freshly opened ticket from a validated submission
#[must_use]
pub fn open_ticket(submission: NewTicket, owner: Owner, prefix: &str, now: DateTime<Utc>) -> Ticket {
    Ticket {
        id: TicketId::new(),
        reference: reference_for(prefix, now),
        category: submission.category,
        status: Status::Opened,
        owner,
        responses: Responses::new(Response::new(
            submission.description,
            submission.attachment_url,
            now,
        )),
        created_at: now,
        resolved_at: None,
        updated_at: now,
        revision: 0,
    }
}

/// System-authored note written by auto-closure
#[must_use]
pub fn closure_note(threshold: Duration) -> String {
    format!(
        "Ticket automatically closed after {} of resolution",
        format_long(threshold)
    )
}

/// Whether a resolved ticket has aged past the closure threshold at `now`
#[must_use]
pub fn is_due_for_closure(ticket: &Ticket, threshold: Duration, now: DateTime<Utc>) -> bool {
    ticket.status == Status::Resolved
        && ticket
            .resolved_at
            .is_some_and(|resolved_at| now - resolved_at >= threshold)
}

/// A requested lifecycle transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Resolve {
        response: String,
        attachment_url: Option<String>,
    },
    Reopen {
        note: Option<String>,
    },
    AutoClose {
        threshold: Duration,
    },
}

impl Transition {
    #[must_use]
    pub const fn action(&self) -> Action {
        match self {
            Self::Resolve { .. } => Action::Resolve,
            Self::Reopen { .. } => Action::Reopen,
            Self::AutoClose { .. } => Action::AutoClose,
        }
    }

    /// Check the caller's input without looking at any ticket
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Resolve {
                response,
                attachment_url,
            } => {
                validate_response(response)?;
                normalize_attachment(attachment_url.clone())?;
                Ok(())
            },
            Self::Reopen { .. } => Ok(()),
            Self::AutoClose { threshold } => {
                if *threshold <= Duration::zero() {
                    return Err(HelpdeskError::Config(
                        "closure threshold must be positive".to_string(),
                    ));
                }
                Ok(())
            },
        }
    }

    /// Compute the patch this transition applies to `ticket` at `now`
    pub fn plan(&self, ticket: &Ticket, now: DateTime<Utc>) -> Result<TicketPatch> {
        let action = self.action();
        if !action.is_allowed_from(ticket.status) {
            return Err(HelpdeskError::IllegalTransition {
                id: ticket.display_ref(),
                action,
                from: ticket.status,
            });
        }

        match self {
            Self::Resolve {
                response,
                attachment_url,
            } => {
                validate_response(response)?;
                let attachment = normalize_attachment(attachment_url.clone())?;
                Ok(TicketPatch {
                    status: Status::Resolved,
                    updated_at: now,
                    resolved_at: ResolvedAtUpdate::Set(now),
                    append: (
                        FollowUpKind::Resolved,
                        Response::new(response.clone(), attachment, now),
                    ),
                })
            },
            Self::Reopen { note } => {
                let note = note
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .unwrap_or(DEFAULT_REOPEN_NOTE);
                Ok(TicketPatch {
                    status: Status::Reopened,
                    updated_at: now,
                    resolved_at: ResolvedAtUpdate::Clear,
                    append: (FollowUpKind::Reopened, Response::new(note, None, now)),
                })
            },
            Self::AutoClose { threshold } => {
                let Some(resolved_at) = ticket.resolved_at else {
                    return Err(HelpdeskError::ClosureNotDue {
                        id: ticket.display_ref(),
                        remaining: "unknown, no resolution time recorded".to_string(),
                    });
                };
                let age = now - resolved_at;
                if age < *threshold {
                    return Err(HelpdeskError::ClosureNotDue {
                        id: ticket.display_ref(),
                        remaining: format_long(threshold.checked_sub(&age).unwrap_or(*threshold)),
                    });
                }
                Ok(TicketPatch {
                    status: Status::Closed,
                    updated_at: now,
                    resolved_at: ResolvedAtUpdate::Keep,
                    append: (
                        FollowUpKind::Closed,
                        Response::new(closure_note(*threshold), None, now),
                    ),
                })
            },
        }
    }
}
