//! helpdesk - customer support tickets with time-based auto-closure
//!
//! A ticket is opened by a signed-in user, answered by support (`Resolved`),
//! optionally reopened by its submitter, and closed automatically once its
//! resolution has stood unchallenged for the closure threshold (three days by
//! default).
//!
//! - [`core`]: ticket model, state machine, countdown and durations
//! - [`storage`]: document store trait with file-backed and in-memory stores
//! - [`identity`]: acting-user lookup, backed by a local profile
//! - [`manager`]: transitions with conditional writes and conflict retry
//! - [`sweep`]: the periodic auto-closure job
//! - [`cli`]: the `helpdesk` command-line front end

// Allow missing error documentation for internal implementations
#![allow(clippy::missing_errors_doc)]
// Allow some pedantic lints that don't improve code quality
#![allow(clippy::option_if_let_else)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::single_match_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::map_unwrap_or)]

//! # Concurrent Safety
//!
//! Every transition is a single conditional write against the ticket's
//! revision. A user reopening a ticket while the sweep closes it cannot lose
//! either write: the loser re-plans against the fresh document and is then
//! applied or rejected as an illegal transition.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use helpdesk::core::{Category, NewTicket};
//! use helpdesk::manager::{TicketManager, TicketPolicy};
//! use helpdesk::storage::MemoryStorage;
//!
//! let manager = TicketManager::new(Arc::new(MemoryStorage::new()), TicketPolicy::default());
//! let ticket = manager
//!     .create(NewTicket::new(Category::TechnicalSupport, "Cannot sign in since Monday"), &identity)
//!     .await?;
//! manager.resolve(&ticket.id, "Password reset link sent", None).await?;
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod identity;
pub mod integration;
pub mod manager;
pub mod storage;
pub mod sweep;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{HelpdeskError, Result};
