//! # Audit Log Retention and Persistence Behavior
//!
//! The log is bounded to the 100 most recent entries, newest first, and the
//! platform never fails to start over a broken durable store.

use earntask_state::{
    AppState, FailingPersistence, InMemoryPersistence, LogSeverity, StatePersistence, StateStore,
    StoreConfig,
};

#[test]
fn log_keeps_exactly_the_newest_hundred() {
    let mut store = StateStore::seeded(Box::new(InMemoryPersistence::new()), StoreConfig::default());
    for i in 0..130 {
        store.append_log(&format!("action {i}"), LogSeverity::Info);
    }
    let logs = &store.state().logs;
    assert_eq!(logs.len(), 100);
    assert_eq!(logs[0].action, "action 129");
    assert_eq!(logs[99].action, "action 30");
    // Newest-first throughout.
    for pair in logs.windows(2) {
        assert!(pair[0].timestamp >= pair[1].timestamp);
    }
}

#[test]
fn every_mutation_is_audited_with_severity() {
    let mut store = StateStore::seeded(Box::new(InMemoryPersistence::new()), StoreConfig::default());
    store.register("worker@example.com", "pw").unwrap();
    assert_eq!(
        store.state().logs[0].action,
        "New user registered: worker@example.com"
    );
    assert_eq!(store.state().logs[0].severity, LogSeverity::Info);
    // Registration starts the session before logging, so the entry is
    // attributed to the new identity.
    assert_eq!(store.state().logs[0].user, "worker@example.com");

    store.update_currency("€", "EUR");
    assert_eq!(store.state().logs[0].action, "Currency updated to EUR");
    assert_eq!(store.state().logs[0].user, "worker@example.com");
}

#[test]
fn startup_over_broken_store_falls_back_to_seed() {
    let store = StateStore::open(Box::new(FailingPersistence), StoreConfig::default());
    assert_eq!(store.state().tasks.len(), 2);
    assert_eq!(store.state().users.len(), 1);
    assert!(store.state().logs.is_empty());
}

#[test]
fn mutations_survive_save_failures() {
    let mut store = StateStore::open(Box::new(FailingPersistence), StoreConfig::default());
    let user = store.register("worker@example.com", "pw").unwrap();
    store.toggle_user_status(user.id);
    // Every save failed, but the in-memory snapshot carried each change.
    assert_eq!(store.state().users.len(), 2);
    assert_eq!(store.state().logs.len(), 2);
}

#[test]
fn saved_snapshot_round_trips_through_persistence() {
    let persistence = InMemoryPersistence::new();
    let saved: AppState = {
        let mut store = StateStore::seeded(
            Box::new(InMemoryPersistence::new()),
            StoreConfig::default(),
        );
        store.register("worker@example.com", "pw").unwrap();
        store.state().clone()
    };
    persistence.save(&saved).unwrap();

    let reopened = StateStore::open(Box::new(persistence), StoreConfig::default());
    assert_eq!(reopened.state(), &saved);
    assert_eq!(
        reopened.current_user().unwrap().email,
        "worker@example.com"
    );
}
