use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry in a ticket's response thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Free-text body
    pub response: String,

    /// Optional attachment reference (URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Response {
    #[must_use]
    pub fn new(response: impl Into<String>, attachment_url: Option<String>, at: DateTime<Utc>) -> Self {
        Self {
            response: response.into(),
            attachment_url: attachment_url.filter(|url| !url.trim().is_empty()),
            created_at: at,
        }
    }
}

/// Kinds of entries appended after the opening response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FollowUpKind {
    Resolved,
    Reopened,
    Closed,
}

impl fmt::Display for FollowUpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Resolved => "resolved",
            Self::Reopened => "reopened",
            Self::Closed => "closed",
        };
        f.write_str(label)
    }
}

/// Response thread of a ticket
///
/// `opened` is written with the ticket. Every later transition appends to the
/// list for its kind; nothing is ever replaced or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Responses {
    pub opened: Response,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resolved: Vec<Response>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reopened: Vec<Response>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub closed: Vec<Response>,
}

impl Responses {
    #[must_use]
    pub const fn new(opened: Response) -> Self {
        Self {
            opened,
            resolved: Vec::new(),
            reopened: Vec::new(),
            closed: Vec::new(),
        }
    }

    pub fn append(&mut self, kind: FollowUpKind, entry: Response) {
        self.entries_mut(kind).push(entry);
    }

    #[must_use]
    pub fn entries(&self, kind: FollowUpKind) -> &[Response] {
        match kind {
            FollowUpKind::Resolved => &self.resolved,
            FollowUpKind::Reopened => &self.reopened,
            FollowUpKind::Closed => &self.closed,
        }
    }

    fn entries_mut(&mut self, kind: FollowUpKind) -> &mut Vec<Response> {
        match kind {
            FollowUpKind::Resolved => &mut self.resolved,
            FollowUpKind::Reopened => &mut self.reopened,
            FollowUpKind::Closed => &mut self.closed,
        }
    }

    /// Most recent entry of the given kind
    #[must_use]
    pub fn latest(&self, kind: FollowUpKind) -> Option<&Response> {
        self.entries(kind).last()
    }

    /// All entries in chronological order, labelled by kind
    #[must_use]
    pub fn timeline(&self) -> Vec<(&'static str, &Response)> {
        let mut items: Vec<(&'static str, &Response)> = vec![("opened", &self.opened)];
        items.extend(self.resolved.iter().map(|r| ("resolved", r)));
        items.extend(self.reopened.iter().map(|r| ("reopened", r)));
        items.extend(self.closed.iter().map(|r| ("closed", r)));
        items.sort_by_key(|(_, r)| r.created_at);
        items
    }
}
