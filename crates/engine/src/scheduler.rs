// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Requeue timers for reconcile passes

use chrono::{DateTime, Utc};
use recur_core::ObjectKey;
use std::collections::HashMap;
use std::time::Duration;

/// Pending passes, one timer per schedule.
#[derive(Debug, Default)]
pub struct Scheduler {
    timers: HashMap<ObjectKey, DateTime<Utc>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the timer for `key`.
    pub fn set_timer(&mut self, key: ObjectKey, after: Duration, now: DateTime<Utc>) {
        self.timers.insert(key, fires_at(after, now));
    }

    /// Fire on the next call to [`Scheduler::fired_timers`].
    pub fn set_due(&mut self, key: ObjectKey, now: DateTime<Utc>) {
        self.timers.insert(key, now);
    }

    pub fn cancel_timer(&mut self, key: &ObjectKey) {
        self.timers.remove(key);
    }

    /// Remove and return every timer due at `now`, in key order.
    pub fn fired_timers(&mut self, now: DateTime<Utc>) -> Vec<ObjectKey> {
        let mut fired: Vec<ObjectKey> = self
            .timers
            .iter()
            .filter(|(_, fires_at)| **fires_at <= now)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &fired {
            self.timers.remove(key);
        }
        fired.sort();
        fired
    }

    /// Get the next timer fire time
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.timers.values().min().copied()
    }

    pub fn has_timers(&self) -> bool {
        !self.timers.is_empty()
    }
}

fn fires_at(after: Duration, now: DateTime<Utc>) -> DateTime<Utc> {
    chrono::Duration::from_std(after)
        .ok()
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
