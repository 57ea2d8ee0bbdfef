//! Service behavior over file-backed collaborators and failing hosts.

use assert_matches::assert_matches;
use std::sync::Arc;
use warden_core::{AuditEffects, PrincipalId, TimelockDefaults, TimelockDelay, Timestamp};
use warden_testkit::{principal, ControllableClock, FailingClock, InMemoryAuditLog, TimelockFixture};
use warden_timelock::{
    ErrorCategory, JsonFileStateStore, JsonlAuditLog, MemoryStateStore, OwnershipHistory,
    StateStore, TimelockError, TimelockFact, TimelockService,
};

#[tokio::test]
async fn file_backed_service_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    let audit_path = dir.path().join("audit.jsonl");
    let clock = ControllableClock::at_secs(1_000);
    let (owner, candidate) = (principal("owner"), principal("candidate"));

    {
        let service = TimelockService::new(
            JsonFileStateStore::new(&state_path),
            clock.clone(),
            JsonlAuditLog::<TimelockFact>::new(&audit_path),
        );
        service
            .initialize(owner, &TimelockDefaults::default())
            .await
            .unwrap();
        service
            .set_owner_timelock(owner, candidate, TimelockDelay::from_secs(5))
            .await
            .unwrap();
        service.init_owner_unlock(candidate).await.unwrap();
    }

    clock.advance_secs(5);
    let service = TimelockService::new(
        JsonFileStateStore::new(&state_path),
        clock.clone(),
        JsonlAuditLog::<TimelockFact>::new(&audit_path),
    );
    assert_eq!(
        service.get_owner_timelock().await.unwrap().requested_at,
        Timestamp::from_secs(1_000)
    );
    let records = service.complete_owner_unlock(candidate).await.unwrap();
    assert_eq!(records[0].sequence, 3);
    assert_eq!(service.owner().await.unwrap(), candidate);

    let history = service.history().await.unwrap();
    assert_eq!(history.current_owner(), Some(candidate));
    assert_eq!(history.records_applied, 4);
}

#[tokio::test]
async fn uninitialized_store_is_reported() {
    let service = TimelockService::new(
        MemoryStateStore::new(),
        ControllableClock::at_secs(0),
        InMemoryAuditLog::<TimelockFact>::new(),
    );
    let err = service.owner().await.unwrap_err();
    assert_matches!(err, TimelockError::Store(_));
    assert_eq!(err.category(), ErrorCategory::Host);
}

#[tokio::test]
async fn clock_failure_aborts_before_any_write() {
    let store = Arc::new(MemoryStateStore::new());
    let audit = InMemoryAuditLog::<TimelockFact>::new();
    let owner = principal("owner");

    let bootstrap = TimelockService::new(
        Arc::clone(&store),
        ControllableClock::at_secs(0),
        audit.clone(),
    );
    bootstrap
        .initialize(owner, &TimelockDefaults::default())
        .await
        .unwrap();

    let service = TimelockService::new(Arc::clone(&store), FailingClock, audit.clone());
    let err = service
        .set_owner_timelock(owner, principal("candidate"), TimelockDelay::from_secs(1))
        .await
        .unwrap_err();
    assert_matches!(err, TimelockError::Clock(_));
    assert_eq!(
        service.get_owner_timelock().await.unwrap().candidate,
        PrincipalId::NULL
    );
    assert_eq!(audit.len(), 1);
}

#[tokio::test]
async fn audit_failure_rolls_back_transfer() {
    let fx = TimelockFixture::pending(TimelockDelay::from_secs(1)).await.unwrap();
    fx.clock.advance_secs(1);
    let view = fx.view().await.unwrap();
    let recorded = fx.audit.len();

    fx.audit.set_fail_appends(true);
    let err = fx
        .service
        .complete_owner_unlock(fx.candidate)
        .await
        .unwrap_err();
    assert_matches!(err, TimelockError::Audit(_));
    assert_eq!(err.code(), "AUDIT");
    assert_eq!(fx.owner_now().await.unwrap(), fx.owner);
    assert_eq!(fx.view().await.unwrap(), view);
    assert_eq!(fx.audit.len(), recorded);

    // The still-pending request completes once the log accepts writes.
    fx.audit.set_fail_appends(false);
    fx.service.complete_owner_unlock(fx.candidate).await.unwrap();
    assert_eq!(fx.owner_now().await.unwrap(), fx.candidate);
    assert_eq!(
        fx.service.history().await.unwrap().current_owner(),
        Some(fx.candidate)
    );
}

#[tokio::test]
async fn audit_failure_rolls_back_reconfiguration() {
    let fx = TimelockFixture::pending(TimelockDelay::from_days(1)).await.unwrap();
    let view = fx.view().await.unwrap();

    fx.audit.set_fail_appends(true);
    assert_matches!(
        fx.service
            .set_owner_timelock(fx.owner, fx.stranger, TimelockDelay::from_secs(0))
            .await,
        Err(TimelockError::Audit(_))
    );
    assert_eq!(fx.view().await.unwrap(), view);
}

#[tokio::test]
async fn audit_failure_during_initialize_allows_retry() {
    let store = Arc::new(MemoryStateStore::new());
    let audit = InMemoryAuditLog::<TimelockFact>::new();
    let service = TimelockService::new(
        Arc::clone(&store),
        ControllableClock::at_secs(0),
        audit.clone(),
    );
    let owner = principal("owner");

    audit.set_fail_appends(true);
    assert_matches!(
        service.initialize(owner, &TimelockDefaults::default()).await,
        Err(TimelockError::Audit(_))
    );
    assert_eq!(store.load().await.unwrap(), None);

    audit.set_fail_appends(false);
    service
        .initialize(owner, &TimelockDefaults::default())
        .await
        .unwrap();
    assert_eq!(service.owner().await.unwrap(), owner);
    assert_eq!(audit.facts(), vec![TimelockFact::genesis(owner)]);
}

#[tokio::test]
async fn history_matches_file_log() {
    let dir = tempfile::tempdir().unwrap();
    let audit_path = dir.path().join("audit.jsonl");
    let fx = TimelockFixture::pending(TimelockDelay::from_secs(1)).await.unwrap();

    let log = JsonlAuditLog::<TimelockFact>::new(&audit_path);
    for record in fx.audit.snapshot() {
        log.append_all(record.recorded_at, vec![record.fact]).await.unwrap();
    }

    let replayed = OwnershipHistory::from_records(&log.records().await.unwrap());
    assert_eq!(replayed, fx.service.history().await.unwrap());
    assert_eq!(
        replayed.pending_request().map(|request| request.candidate),
        Some(fx.candidate)
    );
}
