//! Test helpers for behavioral scenarios.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use recur_adapters::FakeStore;
use recur_core::test_support::ScheduleBuilder;
use recur_core::{FakeClock, JobInstance, ObjectKey, Schedule};
use recur_engine::{PassReport, Reconciler};

pub use recur_adapters::{FailPoint, StoreError};
pub use recur_core::test_support::{instance, schedule};
pub use recur_core::{Clock, ConcurrencyPolicy, InstanceStatus};
pub use recur_engine::{PassOutcome, ReconcileError, ScheduleError};

// Spec polling timeouts
pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 5000;

/// Parse an RFC 3339 timestamp.
pub fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// One schedule store, a controllable clock and a reconciler over both.
pub struct World {
    pub clock: FakeClock,
    pub store: FakeStore,
    reconciler: Reconciler<FakeStore, FakeClock>,
}

impl World {
    pub fn at(now: &str) -> Self {
        let clock = FakeClock::at(at(now));
        let store = FakeStore::new(clock.clone());
        let reconciler = Reconciler::new(store.clone(), clock.clone());
        Self {
            clock,
            store,
            reconciler,
        }
    }

    /// Store a schedule created at midnight on 2026-01-01.
    pub fn add(&self, builder: ScheduleBuilder) -> Schedule {
        self.store
            .add_schedule(builder.created_at(at("2026-01-01T00:00:00Z")).build())
    }

    pub fn seed(&self, instance: JobInstance) -> JobInstance {
        self.store.add_instance(instance)
    }

    pub fn set_time(&self, now: &str) {
        self.clock.set(at(now));
    }

    pub async fn pass(&self, schedule: &Schedule) -> PassReport {
        self.try_pass(schedule).await.unwrap()
    }

    pub async fn try_pass(&self, schedule: &Schedule) -> Result<PassReport, ReconcileError> {
        self.reconciler.reconcile(&schedule.meta.key()).await
    }

    pub fn current(&self, schedule: &Schedule) -> Schedule {
        self.store.schedule(&schedule.meta.key()).unwrap()
    }

    /// Names of instances the schedule currently owns, sorted.
    pub fn instance_names(&self, schedule: &Schedule) -> Vec<String> {
        let mut names: Vec<String> = self
            .store
            .instances(&schedule.meta.key())
            .into_iter()
            .map(|i| i.meta.name)
            .collect();
        names.sort();
        names
    }

    /// Mark an instance finished, as the execution subsystem would.
    pub fn finish(&self, schedule: &Schedule, name: &str, succeeded: bool) {
        let key = ObjectKey::new(schedule.meta.namespace.clone(), name);
        let mut done = instance(schedule, self.clock.now());
        done = if succeeded { done.succeeded() } else { done.failed() };
        self.store.set_instance_status(&key, done.build().status);
    }
}

/// Returns the path to a workspace binary, checking the llvm-cov target
/// directory first and falling back to the test binary's own target dir.
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    // The test binary lives at target/debug/deps/specs-<hash>
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

/// Returns the path to the recurd daemon binary.
pub fn recurd_binary() -> PathBuf {
    binary_path("recurd")
}

/// Poll `check` until it holds or [`SPEC_WAIT_MAX_MS`] elapses.
pub fn wait_for(mut check: impl FnMut() -> bool) -> bool {
    let deadline =
        std::time::Instant::now() + std::time::Duration::from_millis(SPEC_WAIT_MAX_MS);
    while std::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(std::time::Duration::from_millis(SPEC_POLL_INTERVAL_MS));
    }
    check()
}
