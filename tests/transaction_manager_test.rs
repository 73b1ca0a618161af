//! Integration tests for phase-scoped transactions

mod common;

use common::RecordingDb;
use shiftsync::adapters::database::IsolationLevel;
use shiftsync::config::{secret_string, DatabaseConfig};
use shiftsync::core::context::RunContext;
use shiftsync::core::orchestrator::{Phase, TransactionManager};
use shiftsync::domain::ShiftSyncError;
use std::sync::Arc;

fn manager() -> (TransactionManager, Arc<RecordingDb>) {
    let db = Arc::new(RecordingDb::default());
    (TransactionManager::new(db.clone()), db)
}

#[tokio::test]
async fn test_plain_error_rolls_back() {
    let (tm, db) = manager();

    let result = tm
        .phase1_transaction(&RunContext::background(), |_| async {
            Err::<(), _>(ShiftSyncError::Database("connection timeout".to_string()))
        })
        .await;

    assert!(result.is_err());
    assert_eq!(db.events(), vec!["begin", "rollback"]);
}

#[tokio::test]
async fn test_nil_error_commits() {
    let (tm, db) = manager();

    let value = tm
        .phase2_transaction(&RunContext::background(), |_| async { Ok("42 records") })
        .await
        .unwrap();

    assert_eq!(value, "42 records");
    assert_eq!(db.events(), vec!["begin", "commit"]);
}

#[tokio::test]
async fn test_warning_commits_and_is_returned() {
    let (tm, db) = manager();

    let err = tm
        .phase3_transaction(&RunContext::background(), |_| async {
            Err::<(), _>(ShiftSyncError::warning("coverage rounded"))
        })
        .await
        .unwrap_err();

    assert!(err.is_warning());
    assert_eq!(db.events(), vec!["begin", "commit"]);
}

#[tokio::test]
async fn test_pre_cancelled_context_never_begins() {
    let (tm, db) = manager();
    let (shutdown_tx, ctx) = RunContext::channel();
    shutdown_tx.send(true).unwrap();

    let err = tm
        .phase1_transaction(&ctx, |_| async { Ok(()) })
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert!(db.events().is_empty());
}

#[tokio::test]
async fn test_unit_receives_context() {
    let (tm, _db) = manager();
    let (shutdown_tx, ctx) = RunContext::channel();

    let cancelled_inside = tm
        .execute_phase_transaction(&ctx, Phase::Scrape, |unit_ctx| async move {
            shutdown_tx.send(true).unwrap();
            Ok(unit_ctx.is_cancelled())
        })
        .await
        .unwrap();

    assert!(cancelled_inside);
}

#[tokio::test]
async fn test_each_call_is_its_own_transaction() {
    let (tm, db) = manager();
    let ctx = RunContext::background();

    for phase in Phase::ALL {
        tm.execute_phase_transaction(&ctx, phase, |_| async { Ok(()) })
            .await
            .unwrap();
    }

    assert_eq!(db.count("begin"), 3);
    assert_eq!(db.count("commit"), 3);
}

#[test]
fn test_uses_read_committed() {
    let (tm, _db) = manager();
    assert_eq!(tm.isolation_level(), IsolationLevel::ReadCommitted);
}

#[tokio::test]
async fn test_configured_isolation_reaches_begin() {
    let db = Arc::new(RecordingDb::default());
    let mut config = DatabaseConfig::new(secret_string(
        "postgresql://localhost/shiftsync".to_string(),
    ));
    config.isolation_level = IsolationLevel::Serializable;
    let tm = TransactionManager::configured(db.clone(), &config);
    assert_eq!(tm.isolation_level(), IsolationLevel::Serializable);

    tm.phase1_transaction(&RunContext::background(), |_| async { Ok(()) })
        .await
        .unwrap();
    assert_eq!(*db.isolations.lock().unwrap(), vec![IsolationLevel::Serializable]);
}
