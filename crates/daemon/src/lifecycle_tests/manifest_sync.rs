// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use recur_core::test_support::instance;
use recur_core::ConcurrencyPolicy;

#[test]
fn apply_creates_declared_schedules() {
    let store = fake_store();
    let manifest = Manifest::parse(BACKUP).unwrap();

    let sync = apply_manifest(&store, &manifest).unwrap();

    assert_eq!(sync.applied, vec![ObjectKey::new("default", "backup")]);
    assert!(sync.removed.is_empty());
    let stored = store.snapshot_state();
    let backup = stored.get_schedule(&ObjectKey::new("default", "backup")).unwrap();
    assert_eq!(backup.meta.uid, "uid-1");
    assert_eq!(backup.spec.concurrency_policy, ConcurrencyPolicy::Forbid);
}

#[test]
fn reapply_keeps_identity_and_updates_spec() {
    let store = fake_store();
    apply_manifest(&store, &Manifest::parse(BACKUP).unwrap()).unwrap();
    let key = ObjectKey::new("default", "backup");
    let before = store.snapshot_state().get_schedule(&key).cloned().unwrap();

    let edited = BACKUP.replace("forbid", "replace");
    apply_manifest(&store, &Manifest::parse(&edited).unwrap()).unwrap();

    let after = store.snapshot_state().get_schedule(&key).cloned().unwrap();
    assert_eq!(after.meta.uid, before.meta.uid);
    assert_eq!(after.meta.creation_timestamp, before.meta.creation_timestamp);
    assert_eq!(after.spec.concurrency_policy, ConcurrencyPolicy::Replace);
    assert!(after.meta.resource_version > before.meta.resource_version);
}

#[test]
fn schedules_missing_from_manifest_are_removed_with_instances() {
    let store = fake_store();
    apply_manifest(&store, &Manifest::parse(BACKUP).unwrap()).unwrap();
    let key = ObjectKey::new("default", "backup");
    let backup = store.snapshot_state().get_schedule(&key).cloned().unwrap();
    store
        .seed_instance(instance(&backup, FakeClock::new().now()).build())
        .unwrap();

    let sync = apply_manifest(&store, &Manifest::default()).unwrap();

    assert_eq!(sync.removed, vec![key.clone()]);
    assert!(store.schedule_keys().is_empty());
    assert!(store.instances_owned_by(&key).is_empty());
}
