// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runs reconcile passes as their requeue timers fire.

use std::time::Duration;

use recur_adapters::Store;
use recur_core::{format_duration, Clock, ObjectKey};
use recur_engine::{PassOutcome, Reconciler, Scheduler};
use tracing::{debug, warn};

/// Wait before retrying a pass that returned an error.
pub const RETRY_AFTER: Duration = Duration::from_secs(5);

/// Sequential dispatcher: one pass at a time, one timer per schedule.
///
/// With no change notifications to react to, every schedule is revisited at
/// least once per resync interval, including suspended or broken ones.
pub struct Dispatcher<S: Store, C: Clock> {
    reconciler: Reconciler<S, C>,
    scheduler: Scheduler,
    resync: Duration,
}

impl<S: Store, C: Clock> Dispatcher<S, C> {
    pub fn new(reconciler: Reconciler<S, C>, resync: Duration) -> Self {
        Self {
            reconciler,
            scheduler: Scheduler::new(),
            resync,
        }
    }

    pub fn reconciler(&self) -> &Reconciler<S, C> {
        &self.reconciler
    }

    /// Queue a pass for `key` on the next [`Dispatcher::run_due`].
    pub fn enqueue(&mut self, key: ObjectKey) {
        let now = self.reconciler.clock().now();
        self.scheduler.set_due(key, now);
    }

    pub fn forget(&mut self, key: &ObjectKey) {
        self.scheduler.cancel_timer(key);
    }

    pub fn next_deadline(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.scheduler.next_deadline()
    }

    pub fn is_idle(&self) -> bool {
        !self.scheduler.has_timers()
    }

    /// Run every pass whose timer has fired; returns how many ran.
    pub async fn run_due(&mut self) -> usize {
        let now = self.reconciler.clock().now();
        let fired = self.scheduler.fired_timers(now);
        let count = fired.len();
        for key in fired {
            self.dispatch(key).await;
        }
        count
    }

    async fn dispatch(&mut self, key: ObjectKey) {
        let wait = match self.reconciler.reconcile(&key).await {
            Ok(report) if report.outcome == PassOutcome::NotFound => {
                debug!(schedule = %key, "schedule gone, dropping timer");
                return;
            }
            Ok(report) => {
                let failed = report.failed_deletions().count();
                if failed > 0 {
                    warn!(schedule = %key, failed, "some deletions failed");
                }
                report
                    .requeue_after
                    .map_or(self.resync, |after| after.min(self.resync))
            }
            Err(e) => {
                warn!(schedule = %key, error = %e, "reconcile pass failed");
                RETRY_AFTER
            }
        };
        debug!(schedule = %key, after = %format_duration(wait), "requeued");
        let now = self.reconciler.clock().now();
        self.scheduler.set_timer(key, wait, now);
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
