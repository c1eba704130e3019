//! Lifecycle scenarios against the public library API

use chrono::{Duration, TimeZone, Utc};
use helpdesk::core::{Category, FixedClock, FollowUpKind, NewTicket, Status};
use helpdesk::error::HelpdeskError;
use helpdesk::identity::{Identity, StaticIdentity};
use helpdesk::manager::{TicketManager, TicketPolicy};
use helpdesk::storage::{DocumentStore, FileStorage, MemoryStorage};
use helpdesk::sweep::ClosureSweeper;
use std::sync::Arc;
use tempfile::TempDir;

fn identity() -> StaticIdentity {
    StaticIdentity::signed_in(Identity {
        uid: "traveller-42".to_string(),
        name: "Ravi Menon".to_string(),
        email: "ravi@example.com".to_string(),
        phone: String::new(),
        account_id: Some("UID1717000000000".to_string()),
    })
}

fn setup(store: Arc<dyn DocumentStore>) -> (Arc<FixedClock>, Arc<TicketManager>) {
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let clock = Arc::new(FixedClock::new(start));
    let manager = TicketManager::new(store, TicketPolicy::default()).with_clock(clock.clone());
    (clock, Arc::new(manager))
}

fn login_broken() -> NewTicket {
    NewTicket::new(
        Category::TechnicalSupport,
        "My login is broken and I cannot access my account",
    )
}

#[tokio::test]
async fn test_create_opens_ticket_with_description() {
    let (_clock, manager) = setup(Arc::new(MemoryStorage::new()));
    let ticket = manager.create(login_broken(), &identity()).await.unwrap();

    assert_eq!(ticket.status, Status::Opened);
    assert_eq!(
        ticket.responses.opened.response,
        "My login is broken and I cannot access my account"
    );
    assert!(ticket.resolved_at.is_none());
    assert_eq!(ticket.owner.account_id, "UID1717000000000");
}

#[tokio::test]
async fn test_resolve_then_sweep_at_threshold_boundary() {
    let (clock, manager) = setup(Arc::new(MemoryStorage::new()));
    let sweeper = ClosureSweeper::new(manager.clone());
    let ticket = manager.create(login_broken(), &identity()).await.unwrap();
    let resolved = manager.resolve(&ticket.id, "Reset done", None).await.unwrap();
    let resolved_at = resolved.resolved_at.unwrap();

    clock.set(resolved_at + Duration::days(2));
    sweeper.sweep_once().await.unwrap();
    let still_resolved = manager.get(&ticket.id).await.unwrap();
    assert_eq!(still_resolved.status, Status::Resolved);
    assert_eq!(
        manager.countdown(&still_resolved).unwrap().to_string(),
        "Closes in 24h 0m"
    );

    clock.set(resolved_at + Duration::days(3) + Duration::seconds(1));
    let report = sweeper.sweep_once().await.unwrap();
    assert_eq!(report.closed.len(), 1);

    let closed = manager.get(&ticket.id).await.unwrap();
    assert_eq!(closed.status, Status::Closed);
    assert_eq!(closed.resolved_at, Some(resolved_at));
    assert_eq!(
        closed.responses.latest(FollowUpKind::Closed).unwrap().response,
        "Ticket automatically closed after 3 days of resolution"
    );

    // a second sweep appends nothing
    sweeper.sweep_once().await.unwrap();
    let again = manager.get(&ticket.id).await.unwrap();
    assert_eq!(again.responses.entries(FollowUpKind::Closed).len(), 1);
}

#[tokio::test]
async fn test_reopen_clears_resolution_and_escapes_sweep() {
    let (clock, manager) = setup(Arc::new(MemoryStorage::new()));
    let ticket = manager.create(login_broken(), &identity()).await.unwrap();
    manager.resolve(&ticket.id, "Reset done", None).await.unwrap();

    clock.advance(Duration::hours(1));
    let reopened = manager.reopen(&ticket.id, None).await.unwrap();
    assert_eq!(reopened.status, Status::Reopened);
    assert!(reopened.resolved_at.is_none());

    clock.advance(Duration::days(4));
    let report = ClosureSweeper::new(manager.clone()).sweep_once().await.unwrap();
    assert!(report.is_empty());
    assert_eq!(manager.get(&ticket.id).await.unwrap().status, Status::Reopened);
}

#[tokio::test]
async fn test_illegal_transitions_leave_ticket_unchanged() {
    let (_clock, manager) = setup(Arc::new(MemoryStorage::new()));
    let ticket = manager.create(login_broken(), &identity()).await.unwrap();

    let err = manager.reopen(&ticket.id, None).await.unwrap_err();
    assert!(matches!(
        err,
        HelpdeskError::IllegalTransition {
            from: Status::Opened,
            ..
        }
    ));
    let err = manager.auto_close(&ticket.id).await.unwrap_err();
    assert!(matches!(err, HelpdeskError::IllegalTransition { .. }));

    assert_eq!(manager.get(&ticket.id).await.unwrap(), ticket);
}

#[tokio::test]
async fn test_auto_close_before_threshold_is_not_due() {
    let (clock, manager) = setup(Arc::new(MemoryStorage::new()));
    let ticket = manager.create(login_broken(), &identity()).await.unwrap();
    manager.resolve(&ticket.id, "Reset done", None).await.unwrap();
    clock.advance(Duration::hours(1));

    let err = manager.auto_close(&ticket.id).await.unwrap_err();
    assert!(matches!(err, HelpdeskError::ClosureNotDue { .. }));
}

#[tokio::test]
async fn test_concurrent_reopen_and_close_are_both_accounted_for() {
    let (clock, manager) = setup(Arc::new(MemoryStorage::new()));
    let ticket = manager.create(login_broken(), &identity()).await.unwrap();
    manager.resolve(&ticket.id, "Reset done", None).await.unwrap();
    clock.advance(Duration::days(3));

    let closer = {
        let manager = manager.clone();
        let id = ticket.id.clone();
        tokio::spawn(async move { manager.auto_close(&id).await })
    };
    let reopener = {
        let manager = manager.clone();
        let id = ticket.id.clone();
        tokio::spawn(async move { manager.reopen(&id, Some("Still broken".to_string())).await })
    };
    let closed = closer.await.unwrap();
    let reopened = reopener.await.unwrap();

    let final_state = manager.get(&ticket.id).await.unwrap();
    // the reopen always lands: from Resolved, or from Closed if the close won
    assert!(reopened.is_ok());
    assert_eq!(final_state.status, Status::Reopened);
    assert_eq!(final_state.responses.entries(FollowUpKind::Reopened).len(), 1);
    match closed {
        Ok(_) => {
            assert_eq!(final_state.responses.entries(FollowUpKind::Closed).len(), 1);
            assert_eq!(final_state.revision, 3);
        },
        Err(e) => {
            assert!(matches!(e, HelpdeskError::IllegalTransition { .. }));
            assert!(final_state.responses.closed.is_empty());
            assert_eq!(final_state.revision, 2);
        },
    }
}

#[tokio::test]
async fn test_file_store_lifecycle_and_legacy_documents() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path().join(".helpdesk"));
    storage.ensure_directories().await.unwrap();

    let legacy_id = uuid::Uuid::new_v4();
    std::fs::write(
        storage.tickets_dir().join(format!("{legacy_id}.yaml")),
        format!(
            "id: {legacy_id}\n\
             reference: HID00000042\n\
             category: Billing Support\n\
             owner:\n  name: Old User\n  email: old@example.com\n  uid: legacy-uid\n\
             description: Charged twice for the same booking\n\
             created_at: 2023-01-05T10:00:00Z\n"
        ),
    )
    .unwrap();

    let (_clock, manager) = setup(Arc::new(storage));
    let legacy = manager.find("HID00000042").await.unwrap();
    assert_eq!(legacy.status, Status::Opened);
    assert_eq!(legacy.description(), "Charged twice for the same booking");

    let resolved = manager
        .resolve(&legacy.id, "Duplicate charge refunded", None)
        .await
        .unwrap();
    assert_eq!(resolved.status, Status::Resolved);
    assert_eq!(resolved.revision, 1);
    assert_eq!(manager.get(&legacy.id).await.unwrap(), resolved);
}
