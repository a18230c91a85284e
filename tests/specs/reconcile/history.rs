//! Status and history specs
//!
//! How a pass summarizes owned instances and prunes finished ones.

use crate::prelude::*;

#[tokio::test]
async fn status_reflects_active_instances_and_latest_run() {
    let world = World::at("2026-01-01T10:30:00Z");
    let backup = world.add(schedule("backup", "0 * * * *").suspend(true));
    let active = world.seed(instance(&backup, at("2026-01-01T07:00:00Z")).build());
    world.seed(instance(&backup, at("2026-01-01T08:00:00Z")).succeeded().build());
    world.seed(instance(&backup, at("2026-01-01T09:00:00Z")).failed().build());

    world.pass(&backup).await;

    let status = world.current(&backup).status;
    assert_eq!(status.last_schedule_time, Some(at("2026-01-01T09:00:00Z")));
    let active_names: Vec<&str> = status.active.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(active_names, vec![active.meta.name.as_str()]);
    assert_eq!(status.active[0].uid, active.meta.uid);
}

#[tokio::test]
async fn finished_instances_beyond_limits_are_deleted_oldest_first() {
    let world = World::at("2026-01-01T10:30:00Z");
    let backup = world.add(
        schedule("backup", "0 * * * *")
            .suspend(true)
            .success_limit(1)
            .failure_limit(0),
    );
    for hour in ["06", "07", "08"] {
        let t = at(&format!("2026-01-01T{hour}:00:00Z"));
        world.seed(instance(&backup, t).started_at(t).succeeded().build());
    }
    world.seed(instance(&backup, at("2026-01-01T09:00:00Z")).failed().build());

    let report = world.pass(&backup).await;

    assert_eq!(
        world.store.deleted(),
        vec!["backup-1767247200", "backup-1767250800", "backup-1767258000"]
    );
    assert_eq!(report.failed_deletions().count(), 0);
    assert_eq!(world.instance_names(&backup), vec!["backup-1767254400"]);
}

#[tokio::test]
async fn unset_limits_keep_every_finished_instance() {
    let world = World::at("2026-01-01T10:30:00Z");
    let backup = world.add(schedule("backup", "0 * * * *").suspend(true));
    for hour in ["06", "07", "08"] {
        let t = at(&format!("2026-01-01T{hour}:00:00Z"));
        world.seed(instance(&backup, t).succeeded().build());
    }

    world.pass(&backup).await;

    assert!(world.store.deleted().is_empty());
    assert_eq!(world.instance_names(&backup).len(), 3);
}

#[tokio::test]
async fn trimming_failures_do_not_abort_the_pass() {
    let world = World::at("2026-01-01T10:30:00Z");
    let backup = world.add(schedule("backup", "0 * * * *").failure_limit(0));
    world.seed(instance(&backup, at("2026-01-01T09:00:00Z")).failed().build());
    world.store.fail(
        FailPoint::DeleteInstance("backup-1767258000".into()),
        StoreError::Backend("timeout".into()),
    );

    let report = world.pass(&backup).await;

    assert_eq!(report.failed_deletions().count(), 1);
    assert!(report.launched());
}
