// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Injectable wall-clock.
//!
//! Every reconciliation pass reads "now" exactly through a [`Clock`] so the
//! scheduling decision is a function of its inputs. Production wiring uses
//! [`SystemClock`]; tests drive a [`FakeClock`] by hand.

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

/// Source of the current UTC time.
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests.
///
/// Clones share the same underlying instant, so a test can hold one handle
/// and advance the clock seen by a reconciler holding another.
#[derive(Clone, Debug)]
pub struct FakeClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        // 2026-01-01T00:00:00Z
        Self::at(Utc.timestamp_opt(1_767_225_600, 0).single().unwrap_or_default())
    }
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock frozen at `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.current.lock() = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut current = self.current.lock();
        *current += by;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
