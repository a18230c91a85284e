// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Instance classification by completion state.

use chrono::{DateTime, Utc};
use recur_core::{Completion, JobInstance};

/// Observed instances of one schedule, bucketed by completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedInstances {
    pub active: Vec<JobInstance>,
    pub succeeded: Vec<JobInstance>,
    pub failed: Vec<JobInstance>,
    /// Latest scheduled time recorded on any instance, in any bucket.
    pub last_schedule_time: Option<DateTime<Utc>>,
}

impl ClassifiedInstances {
    pub fn total(&self) -> usize {
        self.active.len() + self.succeeded.len() + self.failed.len()
    }
}

/// Partition `instances` into active, succeeded and failed buckets.
///
/// An instance whose scheduled-time annotation does not parse is logged and
/// left out of `last_schedule_time`, but still lands in its bucket.
pub fn classify(instances: Vec<JobInstance>) -> ClassifiedInstances {
    let mut out = ClassifiedInstances::default();
    for instance in instances {
        match instance.scheduled_time() {
            Ok(Some(t)) => {
                out.last_schedule_time = Some(out.last_schedule_time.map_or(t, |cur| cur.max(t)));
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(instance = %instance.key(), error = %e, "unable to parse scheduled time");
            }
        }
        match instance.completion() {
            Completion::Ongoing => out.active.push(instance),
            Completion::Succeeded => out.succeeded.push(instance),
            Completion::Failed => out.failed.push(instance),
        }
    }
    out
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
