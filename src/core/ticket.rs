use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{Response, Responses, Status};
use crate::error::HelpdeskError;

/// Opaque unique ticket identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(Uuid);

impl TicketId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn parse_str(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// First eight hex digits, for compact display
    #[must_use]
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Build the human-readable help-desk reference for a ticket created at `at`
///
/// The reference is the prefix followed by the last eight digits of the
/// creation time in epoch milliseconds, e.g. `HID12345678`.
#[must_use]
pub fn reference_for(prefix: &str, at: DateTime<Utc>) -> String {
    let millis = at.timestamp_millis().rem_euclid(100_000_000);
    format!("{prefix}{millis:08}")
}

/// Topic chosen by the submitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    AccountRelated,
    TechnicalSupport,
    BillingSupport,
    FeatureRequest,
    Other,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::AccountRelated,
        Self::TechnicalSupport,
        Self::BillingSupport,
        Self::FeatureRequest,
        Self::Other,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AccountRelated => "Account Related",
            Self::TechnicalSupport => "Technical Support",
            Self::BillingSupport => "Billing Support",
            Self::FeatureRequest => "Feature Request",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = HelpdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.is_empty() {
            return Err(HelpdeskError::validation("category", "category is required"));
        }
        let squash = |text: &str| -> String {
            text.chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_lowercase()
        };
        let key = squash(wanted);
        Self::ALL
            .into_iter()
            .find(|category| squash(category.label()) == key)
            .ok_or_else(|| {
                HelpdeskError::validation(
                    "category",
                    format!(
                        "unknown category '{wanted}'. Must be one of: {}",
                        Self::ALL.map(Self::label).join(", ")
                    ),
                )
            })
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Snapshot of the submitting identity, captured once at creation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// Stable identity reference
    pub uid: String,
    /// Secondary human-readable account identifier
    #[serde(default)]
    pub account_id: String,
}

/// A help-desk ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TicketDocument")]
pub struct Ticket {
    pub id: TicketId,
    pub reference: String,
    pub category: Category,
    pub status: Status,
    pub owner: Owner,
    pub responses: Responses,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    /// Incremented by the store on every update
    pub revision: u64,
}

impl Ticket {
    /// The description written at submission
    #[must_use]
    pub fn description(&self) -> &str {
        &self.responses.opened.response
    }

    /// Reference if one was assigned, otherwise the short id
    #[must_use]
    pub fn display_ref(&self) -> String {
        if self.reference.is_empty() {
            self.id.short()
        } else {
            self.reference.clone()
        }
    }
}

/// On-disk shape of a ticket, tolerant of older documents
///
/// Older documents carry the description and attachment at the top level and
/// may lack a status; they are normalized into the current shape on read.
#[derive(Deserialize)]
struct TicketDocument {
    id: TicketId,
    #[serde(default)]
    reference: String,
    category: Category,
    #[serde(default)]
    status: Status,
    #[serde(default)]
    owner: Owner,
    #[serde(default)]
    responses: Option<Responses>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    attachment_url: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    revision: u64,
}

impl From<TicketDocument> for Ticket {
    fn from(doc: TicketDocument) -> Self {
        let responses = doc.responses.unwrap_or_else(|| {
            Responses::new(Response::new(
                doc.description.unwrap_or_default(),
                doc.attachment_url,
                doc.created_at,
            ))
        });
        Self {
            id: doc.id,
            reference: doc.reference,
            category: doc.category,
            status: doc.status,
            owner: doc.owner,
            responses,
            created_at: doc.created_at,
            resolved_at: doc.resolved_at,
            updated_at: doc.updated_at.unwrap_or(doc.created_at),
            revision: doc.revision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_reference_format() {
        let at = Utc.timestamp_millis_opt(1_718_000_123_456).unwrap();
        assert_eq!(reference_for("HID", at), "HID00123456");
        assert_eq!(reference_for("T-", at).len(), 10);
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!(
            "Technical Support".parse::<Category>().unwrap(),
            Category::TechnicalSupport
        );
        assert_eq!(
            "technical-support".parse::<Category>().unwrap(),
            Category::TechnicalSupport
        );
        assert_eq!("OTHER".parse::<Category>().unwrap(), Category::Other);

        let err = "".parse::<Category>().unwrap_err();
        assert!(matches!(err, HelpdeskError::Validation { field: "category", .. }));
        assert!("Visa Support".parse::<Category>().is_err());
    }

    #[test]
    fn test_ticket_id_short() {
        let id = TicketId::new();
        assert_eq!(id.short().len(), 8);
        assert_eq!(TicketId::parse_str(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_legacy_document_is_normalized() {
        let yaml = r#"
id: 6f1c2a4e-0a53-4f0e-9d7e-1c2b3a4d5e6f
category: Billing Support
description: I was charged twice for my cruise booking
attachment_url: https://files.example.com/receipt.pdf
created_at: 2024-05-01T10:00:00Z
"#;
        let ticket: Ticket = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(ticket.status, Status::Opened);
        assert_eq!(ticket.description(), "I was charged twice for my cruise booking");
        assert_eq!(
            ticket.responses.opened.attachment_url.as_deref(),
            Some("https://files.example.com/receipt.pdf")
        );
        assert_eq!(ticket.updated_at, ticket.created_at);
        assert!(ticket.resolved_at.is_none());
        assert_eq!(ticket.revision, 0);
        assert_eq!(ticket.display_ref(), ticket.id.short());
    }
}
