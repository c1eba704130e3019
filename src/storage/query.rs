//! Field-level query model shared by all document stores

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;

use crate::core::{Category, Status, Ticket};

/// Queryable ticket fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Status,
    Category,
    OwnerUid,
    CreatedAt,
    UpdatedAt,
    ResolvedAt,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Status => "status",
            Self::Category => "category",
            Self::OwnerUid => "owner.uid",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::ResolvedAt => "resolved_at",
        };
        f.write_str(name)
    }
}

/// Value of a ticket field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Status(Status),
    Category(Category),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Ordering between text or timestamp values of the same kind
    ///
    /// Statuses and categories have no order, so range filters on them never
    /// match and ordering by them keeps the store's order.
    fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<Status> for FieldValue {
    fn from(status: Status) -> Self {
        Self::Status(status)
    }
}

impl From<Category> for FieldValue {
    fn from(category: Category) -> Self {
        Self::Category(category)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(at: DateTime<Utc>) -> Self {
        Self::Timestamp(at)
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Read a field from a ticket; `None` when the document lacks it
#[must_use]
pub fn field_value(ticket: &Ticket, field: Field) -> Option<FieldValue> {
    match field {
        Field::Status => Some(FieldValue::Status(ticket.status)),
        Field::Category => Some(FieldValue::Category(ticket.category)),
        Field::OwnerUid => Some(FieldValue::Text(ticket.owner.uid.clone())),
        Field::CreatedAt => Some(FieldValue::Timestamp(ticket.created_at)),
        Field::UpdatedAt => Some(FieldValue::Timestamp(ticket.updated_at)),
        Field::ResolvedAt => ticket.resolved_at.map(FieldValue::Timestamp),
    }
}

/// Range comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOp {
    Lt,
    Le,
    Gt,
    Ge,
}

impl RangeOp {
    const fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Lt => matches!(ordering, Ordering::Less),
            Self::Le => !matches!(ordering, Ordering::Greater),
            Self::Gt => matches!(ordering, Ordering::Greater),
            Self::Ge => !matches!(ordering, Ordering::Less),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq(Field, FieldValue),
    Range(Field, RangeOp, FieldValue),
}

impl Filter {
    fn matches(&self, ticket: &Ticket) -> bool {
        match self {
            Self::Eq(field, expected) => field_value(ticket, *field).as_ref() == Some(expected),
            Self::Range(field, op, bound) => field_value(ticket, *field)
                .and_then(|actual| actual.compare(bound))
                .is_some_and(|ordering| op.accepts(ordering)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// A conjunctive query with optional ordering and limit
///
/// Documents that lack a filtered or ordered field never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketQuery {
    filters: Vec<Filter>,
    order_by: Option<(Field, Direction)>,
    limit: Option<usize>,
}

impl TicketQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn where_eq(mut self, field: Field, value: impl Into<FieldValue>) -> Self {
        self.filters.push(Filter::Eq(field, value.into()));
        self
    }

    #[must_use]
    pub fn where_range(mut self, field: Field, op: RangeOp, value: impl Into<FieldValue>) -> Self {
        self.filters.push(Filter::Range(field, op, value.into()));
        self
    }

    #[must_use]
    pub const fn order_by(mut self, field: Field, direction: Direction) -> Self {
        self.order_by = Some((field, direction));
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Whether a single ticket satisfies every filter and has the order field
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        let has_order_field = self
            .order_by
            .is_none_or(|(field, _)| field_value(ticket, field).is_some());
        has_order_field && self.filters.iter().all(|f| f.matches(ticket))
    }

    /// Filter, order and truncate a set of tickets
    #[must_use]
    pub fn apply(&self, tickets: impl IntoIterator<Item = Ticket>) -> Vec<Ticket> {
        let mut matched: Vec<Ticket> = tickets.into_iter().filter(|t| self.matches(t)).collect();

        if let Some((field, direction)) = self.order_by {
            matched.sort_by(|a, b| {
                let ordering = match (field_value(a, field), field_value(b, field)) {
                    (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
                    _ => Ordering::Equal,
                };
                match direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }
        matched
    }
}
