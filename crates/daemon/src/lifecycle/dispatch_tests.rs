// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{DateTime, Utc};
use recur_adapters::{FailPoint, FakeStore, StoreError};
use recur_core::test_support::schedule;
use recur_core::FakeClock;

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn setup(now: &str, resync_secs: u64) -> (FakeClock, FakeStore, Dispatcher<FakeStore, FakeClock>) {
    let clock = FakeClock::at(at(now));
    let store = FakeStore::new(clock.clone());
    let dispatcher = Dispatcher::new(
        Reconciler::new(store.clone(), clock.clone()),
        Duration::from_secs(resync_secs),
    );
    (clock, store, dispatcher)
}

#[tokio::test]
async fn enqueued_schedule_runs_then_waits_for_next_occurrence() {
    let (clock, store, mut dispatcher) = setup("2026-01-01T10:30:00Z", 3600);
    let sched = store.add_schedule(
        schedule("backup", "0 * * * *")
            .created_at(at("2026-01-01T00:00:00Z"))
            .build(),
    );
    dispatcher.enqueue(sched.meta.key());

    assert_eq!(dispatcher.run_due().await, 1);
    assert_eq!(store.created().len(), 1);
    assert_eq!(dispatcher.next_deadline(), Some(at("2026-01-01T11:00:00Z")));

    // Nothing is due until the next occurrence.
    clock.set(at("2026-01-01T10:59:59Z"));
    assert_eq!(dispatcher.run_due().await, 0);

    clock.set(at("2026-01-01T11:00:00Z"));
    assert_eq!(dispatcher.run_due().await, 1);
    assert_eq!(store.created().len(), 2);
}

#[tokio::test]
async fn requeue_is_capped_by_resync() {
    let (_clock, store, mut dispatcher) = setup("2026-01-01T10:30:00Z", 60);
    let sched = store.add_schedule(
        schedule("report", "0 6 * * *")
            .created_at(at("2026-01-01T10:00:00Z"))
            .build(),
    );
    dispatcher.enqueue(sched.meta.key());

    dispatcher.run_due().await;

    assert_eq!(dispatcher.next_deadline(), Some(at("2026-01-01T10:31:00Z")));
}

#[tokio::test]
async fn suspended_schedule_falls_back_to_resync() {
    let (_clock, store, mut dispatcher) = setup("2026-01-01T10:30:00Z", 300);
    let sched = store.add_schedule(
        schedule("backup", "0 * * * *")
            .suspend(true)
            .created_at(at("2026-01-01T00:00:00Z"))
            .build(),
    );
    dispatcher.enqueue(sched.meta.key());

    dispatcher.run_due().await;

    assert!(store.created().is_empty());
    assert_eq!(dispatcher.next_deadline(), Some(at("2026-01-01T10:35:00Z")));
}

#[tokio::test]
async fn failed_pass_retries_shortly() {
    let (_clock, store, mut dispatcher) = setup("2026-01-01T10:30:00Z", 300);
    let sched = store.add_schedule(schedule("backup", "0 * * * *").build());
    store.fail(
        FailPoint::ListOwnedInstances,
        StoreError::Backend("timeout".to_string()),
    );
    dispatcher.enqueue(sched.meta.key());

    dispatcher.run_due().await;

    assert_eq!(dispatcher.next_deadline(), Some(at("2026-01-01T10:30:05Z")));
}

#[tokio::test]
async fn deleted_schedule_drops_its_timer() {
    let (_clock, _store, mut dispatcher) = setup("2026-01-01T10:30:00Z", 300);
    dispatcher.enqueue(ObjectKey::new("default", "gone"));

    assert_eq!(dispatcher.run_due().await, 1);
    assert!(dispatcher.is_idle());
}

#[tokio::test]
async fn forget_cancels_pending_pass() {
    let (_clock, store, mut dispatcher) = setup("2026-01-01T10:30:00Z", 300);
    let key = ObjectKey::new("default", "backup");
    dispatcher.enqueue(key.clone());
    dispatcher.forget(&key);

    assert_eq!(dispatcher.run_due().await, 0);
    assert!(store.calls().is_empty());
}
