//! Concurrency policy specs
//!
//! What a due run does while an earlier instance is still active.

use crate::prelude::*;
use recur_adapters::{Propagation, StoreCall};

fn world_with_running(policy: ConcurrencyPolicy) -> (World, recur_core::Schedule) {
    let world = World::at("2026-01-01T10:30:00Z");
    let backup = world.add(schedule("backup", "0 * * * *").policy(policy));
    world.seed(
        instance(&backup, at("2026-01-01T09:00:00Z"))
            .started_at(at("2026-01-01T09:00:05Z"))
            .build(),
    );
    (world, backup)
}

#[tokio::test]
async fn allow_runs_alongside_active_instances() {
    let (world, backup) = world_with_running(ConcurrencyPolicy::Allow);

    let report = world.pass(&backup).await;

    assert!(report.launched());
    assert_eq!(
        world.instance_names(&backup),
        vec!["backup-1767258000", "backup-1767261600"]
    );
    assert!(world.store.deleted().is_empty());
}

#[tokio::test]
async fn forbid_skips_while_active_then_catches_up() {
    let (world, backup) = world_with_running(ConcurrencyPolicy::Forbid);

    let blocked = world.pass(&backup).await;

    assert_eq!(
        blocked.outcome,
        PassOutcome::Blocked {
            scheduled_at: at("2026-01-01T10:00:00Z")
        }
    );
    assert_eq!(world.instance_names(&backup), vec!["backup-1767258000"]);
    assert_eq!(blocked.next_run, Some(at("2026-01-01T11:00:00Z")));

    world.finish(&backup, "backup-1767258000", true);
    world.set_time("2026-01-01T10:40:00Z");
    let resumed = world.pass(&backup).await;

    assert!(resumed.launched());
    assert_eq!(
        world.instance_names(&backup),
        vec!["backup-1767258000", "backup-1767261600"]
    );
}

#[tokio::test]
async fn replace_deletes_active_instances_in_the_background() {
    let (world, backup) = world_with_running(ConcurrencyPolicy::Replace);

    let report = world.pass(&backup).await;

    assert!(report.launched());
    assert_eq!(world.instance_names(&backup), vec!["backup-1767261600"]);
    assert!(world.store.calls().contains(&StoreCall::DeleteInstance {
        key: recur_core::ObjectKey::new("default", "backup-1767258000"),
        propagation: Propagation::Background,
    }));
}

#[tokio::test]
async fn replace_still_launches_when_deletion_fails() {
    let (world, backup) = world_with_running(ConcurrencyPolicy::Replace);
    world.store.fail(
        FailPoint::DeleteInstance("backup-1767258000".into()),
        StoreError::Backend("timeout".into()),
    );

    let report = world.pass(&backup).await;

    assert!(report.launched());
    assert_eq!(report.failed_deletions().count(), 1);
    assert_eq!(
        world.instance_names(&backup),
        vec!["backup-1767258000", "backup-1767261600"]
    );
}
