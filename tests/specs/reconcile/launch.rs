//! Launch specs
//!
//! When a pass creates an instance, for which occurrence, and when it asks
//! to run again.

use crate::prelude::*;
use recur_core::ObjectKey;
use std::time::Duration;

#[tokio::test]
async fn catch_up_launches_only_the_latest_missed_run() {
    let world = World::at("2026-01-01T10:30:00Z");
    let backup = world.add(schedule("backup", "0 * * * *"));

    let report = world.pass(&backup).await;

    assert!(report.launched());
    assert_eq!(world.instance_names(&backup), vec!["backup-1767261600"]);
    assert_eq!(report.next_run, Some(at("2026-01-01T11:00:00Z")));
    assert_eq!(report.requeue_after, Some(Duration::from_secs(30 * 60)));
}

#[tokio::test]
async fn repeated_passes_do_not_launch_twice() {
    let world = World::at("2026-01-01T10:30:00Z");
    let backup = world.add(schedule("backup", "0 * * * *"));

    world.pass(&backup).await;
    let again = world.pass(&backup).await;

    assert_eq!(again.outcome, PassOutcome::Idle);
    assert_eq!(world.store.created().len(), 1);
    assert_eq!(
        world.current(&backup).status.last_schedule_time,
        Some(at("2026-01-01T10:00:00Z"))
    );
}

#[tokio::test]
async fn each_occurrence_launches_as_time_advances() {
    let world = World::at("2026-01-01T10:30:00Z");
    let report = world.add(schedule("report", "0 6 * * *"));

    world.pass(&report).await;
    world.set_time("2026-01-02T06:00:30Z");
    let second = world.pass(&report).await;

    assert_eq!(
        second.outcome,
        PassOutcome::Created {
            instance: ObjectKey::new("default", "report-1767333600"),
            scheduled_at: at("2026-01-02T06:00:00Z"),
        }
    );
    assert_eq!(
        world.instance_names(&report),
        vec!["report-1767247200", "report-1767333600"]
    );
    assert_eq!(second.next_run, Some(at("2026-01-03T06:00:00Z")));
}

#[tokio::test]
async fn occurrence_outside_starting_deadline_is_skipped() {
    let world = World::at("2026-01-01T10:01:30Z");
    let backup = world.add(schedule("backup", "0 * * * *").starting_deadline_seconds(30));

    let report = world.pass(&backup).await;

    assert!(!report.launched());
    assert!(world.instance_names(&backup).is_empty());
    assert_eq!(report.next_run, Some(at("2026-01-01T11:00:00Z")));
    assert_eq!(report.requeue_after, Some(Duration::from_secs(58 * 60 + 30)));
}

#[tokio::test]
async fn too_many_missed_runs_stops_the_schedule() {
    let world = World::at("2026-01-01T10:30:00Z");
    let every_minute = world.add(schedule("tick", "* * * * *"));

    let report = world.pass(&every_minute).await;

    assert_eq!(
        report.outcome,
        PassOutcome::ScheduleFailed(ScheduleError::TooManyMissed { limit: 100 })
    );
    assert_eq!(report.requeue_after, None);
    assert!(world.store.created().is_empty());
}

#[tokio::test]
async fn starting_deadline_bounds_the_missed_run_count() {
    let world = World::at("2026-01-01T10:30:30Z");
    let every_minute = world.add(schedule("tick", "* * * * *").starting_deadline_seconds(200));

    let report = world.pass(&every_minute).await;

    assert_eq!(
        report.outcome,
        PassOutcome::Created {
            instance: ObjectKey::new("default", "tick-1767263400"),
            scheduled_at: at("2026-01-01T10:30:00Z"),
        }
    );
    assert_eq!(report.requeue_after, Some(Duration::from_secs(30)));
}

#[tokio::test]
async fn invalid_expression_is_reported_without_requeue() {
    let world = World::at("2026-01-01T10:30:00Z");
    let broken = world.add(schedule("broken", "every tuesday"));

    let report = world.pass(&broken).await;

    assert!(matches!(
        report.outcome,
        PassOutcome::ScheduleFailed(ScheduleError::Invalid { .. })
    ));
    assert_eq!(report.requeue_after, None);
    assert!(world.store.created().is_empty());
}

#[tokio::test]
async fn suspended_schedule_keeps_status_current_but_launches_nothing() {
    let world = World::at("2026-01-01T10:30:00Z");
    let backup = world.add(schedule("backup", "0 * * * *").suspend(true));
    let running = world.seed(instance(&backup, at("2026-01-01T09:00:00Z")).build());

    let report = world.pass(&backup).await;

    assert_eq!(report.outcome, PassOutcome::Suspended);
    assert_eq!(report.requeue_after, None);
    assert!(world.store.created().is_empty());
    let status = world.current(&backup).status;
    assert_eq!(status.active.len(), 1);
    assert_eq!(status.active[0].name, running.meta.name);
    assert_eq!(status.last_schedule_time, Some(at("2026-01-01T09:00:00Z")));
}

#[tokio::test]
async fn store_outage_during_listing_fails_the_pass() {
    let world = World::at("2026-01-01T10:30:00Z");
    let backup = world.add(schedule("backup", "0 * * * *"));
    world.store.fail(
        FailPoint::ListOwnedInstances,
        StoreError::Backend("connection refused".into()),
    );

    let result = world.try_pass(&backup).await;

    assert!(result.is_err());
    assert!(world.store.created().is_empty());

    world.store.clear_failures();
    assert!(world.pass(&backup).await.launched());
}
