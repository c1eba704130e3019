//! Periodic auto-closure of aged resolutions
//!
//! A sweep queries resolved tickets whose `resolved_at` is at least the
//! closure threshold in the past and closes each one concurrently. A failure
//! on one ticket never stops the others; it is reported and the ticket is
//! picked up again by the next sweep.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::core::{Ticket, TicketId};
use crate::error::{HelpdeskError, Result};
use crate::manager::TicketManager;

/// A ticket touched by a sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepEntry {
    pub id: TicketId,
    pub reference: String,
}

impl SweepEntry {
    fn of(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id.clone(),
            reference: ticket.display_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepFailure {
    pub id: TicketId,
    pub reference: String,
    pub error: String,
    /// Whether the next sweep is expected to succeed
    pub transient: bool,
}

/// Outcome of one sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub started_at: DateTime<Utc>,
    /// Tickets the due-for-closure query returned
    pub scanned: usize,
    pub closed: Vec<SweepEntry>,
    /// Tickets that changed state before their closure landed
    pub skipped: Vec<SweepEntry>,
    pub failed: Vec<SweepFailure>,
}

impl SweepReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scanned == 0
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs closure sweeps against a [`TicketManager`]
#[derive(Debug, Clone)]
pub struct ClosureSweeper {
    manager: Arc<TicketManager>,
}

impl ClosureSweeper {
    #[must_use]
    pub const fn new(manager: Arc<TicketManager>) -> Self {
        Self { manager }
    }

    /// Close every ticket that is due right now
    ///
    /// Only the initial query can fail the sweep as a whole. Per-ticket
    /// errors land in [`SweepReport::failed`]; tickets that were reopened or
    /// already closed in the meantime land in [`SweepReport::skipped`].
    pub async fn sweep_once(&self) -> Result<SweepReport> {
        let started_at = self.manager.now();
        let due = self.manager.due_for_closure().await?;
        let scanned = due.len();
        debug!(scanned, "closure sweep started");

        let mut tasks = JoinSet::new();
        let mut pending = HashMap::with_capacity(scanned);
        for ticket in due {
            let manager = Arc::clone(&self.manager);
            let entry = SweepEntry::of(&ticket);
            let handle = tasks.spawn(async move { manager.auto_close(&ticket.id).await });
            pending.insert(handle.id(), entry);
        }

        let mut report = SweepReport {
            started_at,
            scanned,
            closed: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        };

        while let Some(joined) = tasks.join_next_with_id().await {
            let (task_id, outcome) = match joined {
                Ok((task_id, outcome)) => (task_id, Ok(outcome)),
                Err(e) => (e.id(), Err(e)),
            };
            let Some(entry) = pending.remove(&task_id) else {
                error!(task = %task_id, "closure task finished without a ticket");
                continue;
            };
            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(ticket = %entry.reference, error = %e, "closure task aborted");
                    report.failed.push(SweepFailure {
                        transient: false,
                        error: format!("closure task aborted: {e}"),
                        id: entry.id,
                        reference: entry.reference,
                    });
                    continue;
                },
            };
            match outcome {
                Ok(_) => report.closed.push(entry),
                Err(
                    HelpdeskError::IllegalTransition { .. }
                    | HelpdeskError::ClosureNotDue { .. }
                    | HelpdeskError::TicketNotFound { .. },
                ) => {
                    debug!(ticket = %entry.reference, "no longer due, skipped");
                    report.skipped.push(entry);
                },
                Err(e) => {
                    warn!(ticket = %entry.reference, error = %e, "auto-close failed");
                    report.failed.push(SweepFailure {
                        transient: e.is_transient(),
                        error: e.to_string(),
                        id: entry.id,
                        reference: entry.reference,
                    });
                },
            }
        }

        report.closed.sort_by(|a, b| a.reference.cmp(&b.reference));
        report.skipped.sort_by(|a, b| a.reference.cmp(&b.reference));
        report.failed.sort_by(|a, b| a.reference.cmp(&b.reference));

        if !report.is_empty() {
            info!(
                scanned = report.scanned,
                closed = report.closed.len(),
                skipped = report.skipped.len(),
                failed = report.failed.len(),
                "closure sweep finished"
            );
        }
        Ok(report)
    }

    /// Sweep every `interval` until `shutdown` is cancelled
    ///
    /// The first sweep runs immediately. `on_report` sees every completed
    /// sweep; a sweep whose query fails is logged and retried on the next tick.
    pub async fn run<F>(&self, interval: Duration, shutdown: CancellationToken, mut on_report: F)
    where
        F: FnMut(&SweepReport) + Send,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_secs = interval.as_secs(), "closure sweeper started");

        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    info!("closure sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    match self.sweep_once().await {
                        Ok(report) => on_report(&report),
                        Err(e) => error!(error = %e, "closure sweep failed"),
                    }
                }
            }
        }
    }
}
