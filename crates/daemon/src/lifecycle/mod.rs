// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, shutdown, recovery.

mod dispatch;
pub use dispatch::{Dispatcher, RETRY_AFTER};

use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use fs2::FileExt;
use recur_adapters::{MemoryStore, StoreError, TracedStore};
use recur_core::{Clock, IdGen, ObjectKey, SystemClock, UuidIdGen};
use recur_engine::Reconciler;
use recur_storage::{Snapshot, SnapshotError, StoreState};
use thiserror::Error;
use tracing::{info, warn};

use crate::manifest::{Manifest, ManifestError};

/// Daemon dispatcher with concrete store and clock (store wrapped with tracing)
pub type DaemonDispatcher = Dispatcher<TracedStore<MemoryStore>, SystemClock>;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/recur)
    pub state_dir: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Path to snapshot file
    pub snapshot_path: PathBuf,
    /// Schedule manifest; when set, it is the source of truth for schedules
    pub manifest_path: Option<PathBuf>,
    /// Longest wait between passes for one schedule
    pub resync_interval: Duration,
    /// Resolution of the requeue timer loop
    pub timer_check: Duration,
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self, LifecycleError> {
        let mut config = Self::in_dir(crate::env::state_dir()?);
        config.manifest_path = crate::env::manifest_path();
        config.resync_interval = crate::env::resync_interval();
        if let Some(interval) = crate::env::timer_check_ms() {
            config.timer_check = interval;
        }
        Ok(config)
    }

    /// Default layout under `state_dir`.
    pub fn in_dir(state_dir: PathBuf) -> Self {
        Self {
            lock_path: state_dir.join("daemon.pid"),
            log_path: state_dir.join("daemon.log"),
            snapshot_path: state_dir.join("snapshot.json"),
            manifest_path: None,
            resync_interval: crate::env::DEFAULT_RESYNC,
            timer_check: Duration::from_secs(1),
            state_dir,
        }
    }
}

/// Daemon state during operation.
pub struct DaemonState {
    /// Configuration
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Object store (shared with the dispatcher's traced wrapper)
    pub store: MemoryStore,
    /// Reconcile dispatch and requeue timers
    pub dispatcher: DaemonDispatcher,
    /// When daemon started
    pub start_time: Instant,
}

impl DaemonState {
    /// Persist the store to the snapshot file.
    pub fn save_snapshot(&self) -> Result<(), LifecycleError> {
        let snapshot = Snapshot::new(self.store.snapshot_state(), SystemClock.now());
        snapshot.save(&self.config.snapshot_path)?;
        tracing::debug!(
            schedules = snapshot.state.schedules.len(),
            instances = snapshot.state.instances.len(),
            "saved snapshot"
        );
        Ok(())
    }

    /// Re-read the manifest and queue a pass for every schedule.
    pub fn reload_manifest(&mut self) -> Result<ManifestSync, LifecycleError> {
        let Some(path) = self.config.manifest_path.clone() else {
            return Ok(ManifestSync::default());
        };
        let sync = apply_manifest(&self.store, &Manifest::load(&path)?)?;
        for key in &sync.removed {
            self.dispatcher.forget(key);
        }
        for key in self.store.schedule_keys() {
            self.dispatcher.enqueue(key);
        }
        info!(
            applied = sync.applied.len(),
            removed = sync.removed.len(),
            "reloaded manifest"
        );
        Ok(sync)
    }

    /// Shutdown the daemon gracefully.
    pub fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");

        if let Err(e) = self.save_snapshot() {
            warn!("Failed to save shutdown snapshot: {}", e);
        }

        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        // Lock file is released automatically when self.lock_file is dropped
        info!("Daemon shutdown complete");
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Schedules touched by applying a manifest.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ManifestSync {
    pub applied: Vec<ObjectKey>,
    /// Stored schedules absent from the manifest, removed with their instances.
    pub removed: Vec<ObjectKey>,
}

/// Make the store's schedules match `manifest`.
///
/// Existing schedules keep their identity and status, so instances they
/// launched stay owned across restarts and edits.
pub fn apply_manifest<C: Clock, G: IdGen>(
    store: &MemoryStore<C, G>,
    manifest: &Manifest,
) -> Result<ManifestSync, LifecycleError> {
    let declared = manifest.keys();
    let mut sync = ManifestSync::default();
    for key in store.schedule_keys() {
        if !declared.contains(&key) {
            store.remove_schedule(&key)?;
            info!(schedule = %key, "removed schedule no longer in manifest");
            sync.removed.push(key);
        }
    }
    for schedule in manifest.schedules() {
        let applied = store.apply_schedule(schedule);
        sync.applied.push(applied.meta.key());
    }
    Ok(sync)
}

/// Start the daemon
pub fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    match startup_inner(config) {
        Ok(result) => Ok(result),
        Err(e) => {
            // Lock not acquired: the pid and snapshot files
            // belong to the daemon that holds it.
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
fn startup_inner(config: &Config) -> Result<DaemonState, LifecycleError> {
    // 1. Create state directory
    std::fs::create_dir_all(&config.state_dir)?;

    // 2. Acquire lock file FIRST - prevents races
    // Use OpenOptions to avoid truncating the file before we hold the lock,
    // which would wipe the running daemon's PID.
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    // Write PID to lock file (truncate now that we hold the lock)
    use std::io::Write;
    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    // 3. Load state from snapshot (if exists)
    let state = match Snapshot::load(&config.snapshot_path)? {
        Some(snapshot) => {
            info!(
                "Loaded snapshot from {}: {} schedules, {} instances",
                snapshot.created_at,
                snapshot.state.schedules.len(),
                snapshot.state.instances.len()
            );
            snapshot.state
        }
        None => {
            info!("No snapshot found, starting with empty state");
            StoreState::default()
        }
    };
    let store = MemoryStore::with_state(state, SystemClock, UuidIdGen);

    // 4. Apply the manifest over recovered state
    if let Some(path) = &config.manifest_path {
        let sync = apply_manifest(&store, &Manifest::load(path)?)?;
        info!(
            applied = sync.applied.len(),
            removed = sync.removed.len(),
            "applied manifest {}",
            path.display()
        );
    }

    // 5. Queue an initial pass for every schedule
    let reconciler = Reconciler::new(TracedStore::new(store.clone()), SystemClock);
    let mut dispatcher = Dispatcher::new(reconciler, config.resync_interval);
    let keys = store.schedule_keys();
    for key in &keys {
        dispatcher.enqueue(key.clone());
    }

    info!(schedules = keys.len(), "Daemon started");

    Ok(DaemonState {
        config: config.clone(),
        lock_file,
        store,
        dispatcher,
        start_time: Instant::now(),
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config) {
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

#[cfg(test)]
#[path = "../lifecycle_tests/mod.rs"]
mod tests;
