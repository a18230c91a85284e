// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn startup_writes_pid_and_queues_manifest_schedules() {
    let dir = tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.manifest_path = Some(write_manifest(dir.path(), BACKUP));

    let daemon = startup(&config).unwrap();

    let pid = std::fs::read_to_string(&config.lock_path).unwrap();
    assert_eq!(pid.trim(), std::process::id().to_string());
    assert_eq!(
        daemon.store.schedule_keys(),
        vec![ObjectKey::new("default", "backup")]
    );
    assert!(!daemon.dispatcher.is_idle());
}

#[test]
fn shutdown_saves_snapshot_and_restart_recovers_identity() {
    let dir = tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.manifest_path = Some(write_manifest(dir.path(), BACKUP));
    let key = ObjectKey::new("default", "backup");

    let mut daemon = startup(&config).unwrap();
    let uid = daemon.store.snapshot_state().get_schedule(&key).unwrap().meta.uid.clone();
    daemon.shutdown().unwrap();
    drop(daemon);

    assert!(config.snapshot_path.exists());
    assert!(!config.lock_path.exists());

    let restarted = startup(&config).unwrap();
    let recovered = restarted.store.snapshot_state();
    assert_eq!(recovered.get_schedule(&key).unwrap().meta.uid, uid);
}

#[test]
fn startup_without_manifest_uses_snapshot_only() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());

    let daemon = startup(&config).unwrap();

    assert!(daemon.store.schedule_keys().is_empty());
    assert!(daemon.dispatcher.is_idle());
}

#[test]
fn startup_bad_manifest_fails_and_releases_lock() {
    let dir = tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.manifest_path = Some(write_manifest(dir.path(), "[schedule.a]\n"));

    match startup(&config) {
        Err(LifecycleError::Manifest(_)) => {}
        Err(e) => panic!("expected manifest error, got: {e}"),
        Ok(_) => panic!("expected manifest error, but startup succeeded"),
    }
    assert!(!config.lock_path.exists(), "lock file should be cleaned up");
}

#[test]
fn startup_lock_failed_does_not_remove_existing_files() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    std::fs::create_dir_all(&config.state_dir).unwrap();

    // Hold an exclusive lock (simulating the running daemon)
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)
        .unwrap();
    lock_file.lock_exclusive().unwrap();
    std::fs::write(&config.lock_path, b"12345").unwrap();

    match startup(&config) {
        Err(LifecycleError::LockFailed(_)) => {}
        Err(e) => panic!("expected LockFailed, got: {e}"),
        Ok(_) => panic!("expected LockFailed, but startup succeeded"),
    }

    assert_eq!(
        std::fs::read_to_string(&config.lock_path).unwrap(),
        "12345",
        "running daemon's PID must survive a failed startup"
    );
}

#[tokio::test]
async fn reload_manifest_applies_edits_and_requeues() {
    let dir = tempdir().unwrap();
    let mut config = test_config(dir.path());
    let manifest = write_manifest(dir.path(), BACKUP);
    config.manifest_path = Some(manifest.clone());

    let mut daemon = startup(&config).unwrap();
    daemon.dispatcher.run_due().await;

    std::fs::write(
        &manifest,
        "[schedule.report]\nschedule = \"30 6 * * *\"\n",
    )
    .unwrap();
    let sync = daemon.reload_manifest().unwrap();

    assert_eq!(sync.removed, vec![ObjectKey::new("default", "backup")]);
    assert_eq!(
        daemon.store.schedule_keys(),
        vec![ObjectKey::new("default", "report")]
    );
    assert_eq!(daemon.dispatcher.run_due().await, 1);
}
