//! Daemon lifecycle specs
//!
//! Start recurd against a temporary state directory and manifest, then
//! verify the lock, the pid file and the shutdown snapshot.

use crate::prelude::*;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Child, Command, Stdio};

const MANIFEST: &str = r#"
[schedule.backup]
schedule = "0 * * * *"
concurrency_policy = "forbid"
successful_jobs_history_limit = 3

[schedule.backup.template]
labels = { app = "backup" }
payload = { image = "backup:latest" }
"#;

fn spawn_daemon(state: &Path, manifest: &Path) -> Child {
    Command::new(recurd_binary())
        .env("RECUR_STATE_DIR", state)
        .env("RECUR_MANIFEST", manifest)
        .env("RECUR_TIMER_CHECK_MS", "50")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap()
}

fn wait_ready(child: &mut Child) {
    let stdout = child.stdout.take().unwrap();
    let mut line = String::new();
    BufReader::new(stdout).read_line(&mut line).unwrap();
    assert_eq!(line.trim(), "READY", "daemon did not report ready");
}

fn terminate(child: &mut Child) {
    let status = Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());
    let exit = child.wait().unwrap();
    assert!(exit.success(), "daemon exited with {exit:?}");
}

#[test]
fn daemon_writes_pid_and_snapshot_on_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state");
    let manifest = dir.path().join("schedules.toml");
    std::fs::write(&manifest, MANIFEST).unwrap();

    let mut daemon = spawn_daemon(&state, &manifest);
    wait_ready(&mut daemon);

    let pid = std::fs::read_to_string(state.join("daemon.pid")).unwrap();
    assert_eq!(pid.trim(), daemon.id().to_string());

    terminate(&mut daemon);

    assert!(!state.join("daemon.pid").exists(), "pid file should be removed");
    let snapshot = std::fs::read_to_string(state.join("snapshot.json")).unwrap();
    let snapshot: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
    let backup = &snapshot["state"]["schedules"]["default/backup"];
    assert_eq!(backup["spec"]["schedule"], "0 * * * *");
    assert_eq!(backup["spec"]["concurrency_policy"], "forbid");
}

#[test]
fn second_daemon_on_same_state_dir_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state");
    let manifest = dir.path().join("schedules.toml");
    std::fs::write(&manifest, MANIFEST).unwrap();

    let mut first = spawn_daemon(&state, &manifest);
    wait_ready(&mut first);

    let second = spawn_daemon(&state, &manifest).wait_with_output().unwrap();
    assert!(!second.status.success());
    let stderr = String::from_utf8_lossy(&second.stderr);
    assert!(
        stderr.contains("recurd is already running"),
        "expected lock message, got: {stderr}"
    );
    assert!(stderr.contains(&first.id().to_string()), "expected pid of running daemon");

    terminate(&mut first);
}

#[test]
fn invalid_manifest_fails_startup_and_logs_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state");
    let manifest = dir.path().join("schedules.toml");
    std::fs::write(&manifest, "[schedule.backup]\nschedule = 5\n").unwrap();

    let output = spawn_daemon(&state, &manifest).wait_with_output().unwrap();

    assert!(!output.status.success());
    let log = state.join("daemon.log");
    assert!(wait_for(|| std::fs::read_to_string(&log)
        .is_ok_and(|l| l.contains("ERROR Failed to start daemon"))));
    assert!(!state.join("daemon.pid").exists());
}
