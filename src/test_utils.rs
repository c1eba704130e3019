//! Test utilities for helpdesk
//!
//! Common fixtures shared by the unit tests: a fixed epoch, a signed-in
//! identity, an in-memory manager and a store wrapper that injects failures.

#![cfg(test)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::core::{
    Category, FixedClock, NewTicket, Ticket, TicketId, TicketPatch, Transition,
};
use crate::error::{HelpdeskError, Result};
use crate::identity::{Identity, StaticIdentity};
use crate::manager::{TicketManager, TicketPolicy};
use crate::storage::{DocumentStore, FileStorage, MemoryStorage, TicketQuery};

/// 2024-06-10T06:13:20Z, the epoch every fixture starts from
pub fn t0() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_718_000_000_000)
        .single()
        .expect("valid timestamp")
}

/// A signed-in submitter
pub fn sample_identity() -> Identity {
    Identity {
        uid: "user-asha".to_string(),
        name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "+91 98765 43210".to_string(),
        account_id: Some("UID1718000000000".to_string()),
    }
}

pub fn signed_in() -> StaticIdentity {
    StaticIdentity::signed_in(sample_identity())
}

/// A valid submission
pub fn sample_submission() -> NewTicket {
    NewTicket::new(
        Category::TechnicalSupport,
        "My login is broken and I cannot access my account",
    )
}

/// Manager over `store` driven by a fixed clock at [`t0`]
pub fn manager_with(store: Arc<dyn DocumentStore>) -> (Arc<FixedClock>, Arc<TicketManager>) {
    let clock = Arc::new(FixedClock::new(t0()));
    let manager = TicketManager::new(store, TicketPolicy::default()).with_clock(clock.clone());
    (clock, Arc::new(manager))
}

/// Manager over a fresh in-memory store
pub fn memory_manager() -> (Arc<MemoryStorage>, Arc<FixedClock>, Arc<TicketManager>) {
    let store = Arc::new(MemoryStorage::new());
    let (clock, manager) = manager_with(store.clone());
    (store, clock, manager)
}

/// Store wrapper that injects conflicts and transient failures
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStorage,
    conflicts: AtomicU32,
    failing: Mutex<HashSet<TicketId>>,
    panicking: Mutex<HashSet<TicketId>>,
    reopen_after_query: Mutex<Vec<(TicketId, DateTime<Utc>)>>,
    updates: AtomicU32,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `n` updates fail with a revision conflict
    pub fn inject_conflicts(&self, n: u32) {
        self.conflicts.store(n, Ordering::SeqCst);
    }

    /// Updates to `id` fail with a transient store error
    pub fn fail_updates_for(&self, id: &TicketId) {
        self.failing.lock().unwrap().insert(id.clone());
    }

    /// Updates to `id` panic, as a buggy store would
    pub fn panic_updates_for(&self, id: &TicketId) {
        self.panicking.lock().unwrap().insert(id.clone());
    }

    /// The next query returns its results, then `id` is reopened at `at`
    pub fn reopen_after_query(&self, id: &TicketId, at: DateTime<Utc>) {
        self.reopen_after_query.lock().unwrap().push((id.clone(), at));
    }

    /// Number of update attempts seen, successful or not
    pub fn update_attempts(&self) -> u32 {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn create(&self, ticket: &Ticket) -> Result<()> {
        self.inner.create(ticket).await
    }

    async fn get(&self, id: &TicketId) -> Result<Ticket> {
        self.inner.get(id).await
    }

    async fn update_fields(
        &self,
        id: &TicketId,
        expected_revision: u64,
        patch: &TicketPatch,
    ) -> Result<Ticket> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(id) {
            return Err(HelpdeskError::TransientStore(format!(
                "injected failure for {id}"
            )));
        }
        if self.panicking.lock().unwrap().contains(id) {
            panic!("injected panic for {id}");
        }
        let injected = self
            .conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(HelpdeskError::RevisionConflict {
                id: id.to_string(),
                expected: expected_revision,
                actual: expected_revision + 1,
            });
        }
        self.inner.update_fields(id, expected_revision, patch).await
    }

    async fn query(&self, query: &TicketQuery) -> Result<Vec<Ticket>> {
        let found = self.inner.query(query).await?;
        let reopen = std::mem::take(&mut *self.reopen_after_query.lock().unwrap());
        for (id, at) in reopen {
            let current = self.inner.get(&id).await?;
            let patch = Transition::Reopen { note: None }.plan(&current, at)?;
            self.inner.update_fields(&id, current.revision, &patch).await?;
        }
        Ok(found)
    }
}

/// Temporary project with an initialized `.helpdesk` directory
pub struct TestProject {
    pub temp_dir: TempDir,
    pub helpdesk_dir: PathBuf,
    pub storage: FileStorage,
}

impl TestProject {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let helpdesk_dir = temp_dir.path().join(crate::cli::HELPDESK_DIR);
        let storage = FileStorage::new(&helpdesk_dir);
        std::fs::create_dir_all(storage.tickets_dir()).expect("Failed to create tickets dir");

        Self {
            temp_dir,
            helpdesk_dir,
            storage,
        }
    }
}
