//! Display-only "time remaining before auto-closure"

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;

use super::{Status, Ticket};

/// Remaining time before the sweep closes a resolved ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ClosureCountdown {
    Remaining {
        #[serde(rename = "seconds", serialize_with = "serialize_seconds")]
        left: Duration,
    },
    /// Threshold passed, sweep has not run yet
    ClosesSoon,
}

fn serialize_seconds<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(d.num_seconds())
}

impl ClosureCountdown {
    /// Countdown for `ticket`, or `None` unless it is resolved
    #[must_use]
    pub fn for_ticket(ticket: &Ticket, threshold: Duration, now: DateTime<Utc>) -> Option<Self> {
        if ticket.status != Status::Resolved {
            return None;
        }
        let resolved_at = ticket.resolved_at?;
        Some(Self::compute(resolved_at, threshold, now))
    }

    #[must_use]
    pub fn compute(resolved_at: DateTime<Utc>, threshold: Duration, now: DateTime<Utc>) -> Self {
        let left = threshold
            .checked_sub(&(now - resolved_at))
            .unwrap_or(threshold);
        if left <= Duration::zero() {
            Self::ClosesSoon
        } else {
            Self::Remaining { left }
        }
    }
}

impl fmt::Display for ClosureCountdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remaining { left } => {
                let hours = left.num_hours();
                let minutes = left.num_minutes() % 60;
                write!(f, "Closes in {hours}h {minutes}m")
            },
            Self::ClosesSoon => f.write_str("Closes soon"),
        }
    }
}
