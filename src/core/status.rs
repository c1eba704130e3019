use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HelpdeskError;

/// Lifecycle status of a help-desk ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Status {
    /// Newly submitted, waiting for support
    #[default]
    Opened,
    /// Support answered; the submitter may still reopen
    Resolved,
    /// Submitter disputed the resolution
    Reopened,
    /// Resolution aged out and was committed
    Closed,
    /// Resolution is about to be committed
    PendingClosure,
}

impl Status {
    pub const ALL: [Self; 5] = [
        Self::Opened,
        Self::Resolved,
        Self::Reopened,
        Self::Closed,
        Self::PendingClosure,
    ];

    /// Whether the ticket still waits for a support answer
    #[must_use]
    pub const fn awaiting_support(self) -> bool {
        matches!(self, Self::Opened | Self::Reopened)
    }

    /// Whether a resolution timestamp is expected in this status
    #[must_use]
    pub const fn carries_resolution(self) -> bool {
        matches!(self, Self::Resolved | Self::PendingClosure | Self::Closed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Opened => "Opened",
            Self::Resolved => "Resolved",
            Self::Reopened => "Reopened",
            Self::Closed => "Closed",
            Self::PendingClosure => "PendingClosure",
        };
        f.write_str(label)
    }
}

impl FromStr for Status {
    type Err = HelpdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "opened" | "open" => Ok(Self::Opened),
            "resolved" => Ok(Self::Resolved),
            "reopened" => Ok(Self::Reopened),
            "closed" => Ok(Self::Closed),
            "pendingclosure" => Ok(Self::PendingClosure),
            _ => Err(HelpdeskError::validation(
                "status",
                format!(
                    "unknown status '{s}'. Must be one of: opened, resolved, reopened, closed, pending-closure"
                ),
            )),
        }
    }
}

/// A lifecycle action that moves a ticket between statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Resolve,
    Reopen,
    AutoClose,
}

impl Action {
    /// Statuses from which this action is legal
    #[must_use]
    pub const fn allowed_from(self) -> &'static [Status] {
        match self {
            Self::Resolve => &[Status::Opened, Status::Reopened],
            Self::Reopen => &[Status::Resolved, Status::Closed],
            Self::AutoClose => &[Status::Resolved],
        }
    }

    /// Status the ticket ends up in
    #[must_use]
    pub const fn target(self) -> Status {
        match self {
            Self::Resolve => Status::Resolved,
            Self::Reopen => Status::Reopened,
            Self::AutoClose => Status::Closed,
        }
    }

    #[must_use]
    pub fn is_allowed_from(self, status: Status) -> bool {
        self.allowed_from().contains(&status)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Resolve => "resolve",
            Self::Reopen => "reopen",
            Self::AutoClose => "auto-close",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use Status::*;

        assert!(Action::Resolve.is_allowed_from(Opened));
        assert!(Action::Resolve.is_allowed_from(Reopened));
        assert!(!Action::Resolve.is_allowed_from(Resolved));
        assert!(!Action::Resolve.is_allowed_from(Closed));
        assert!(!Action::Resolve.is_allowed_from(PendingClosure));

        for status in Status::ALL {
            let expected = matches!(status, Resolved | Closed);
            assert_eq!(Action::Reopen.is_allowed_from(status), expected, "{status}");
        }

        assert_eq!(Action::AutoClose.allowed_from(), &[Resolved]);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Resolved".parse::<Status>().unwrap(), Status::Resolved);
        assert_eq!("pending-closure".parse::<Status>().unwrap(), Status::PendingClosure);
        assert_eq!("PendingClosure".parse::<Status>().unwrap(), Status::PendingClosure);
        assert_eq!("open".parse::<Status>().unwrap(), Status::Opened);
        assert!("archived".parse::<Status>().is_err());
    }

    #[test]
    fn test_status_serializes_as_label() {
        let yaml = serde_yaml::to_string(&Status::PendingClosure).unwrap();
        assert_eq!(yaml.trim(), "PendingClosure");
    }
}
