// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recurring-job schedule objects.

use crate::instance::InstanceRef;
use crate::meta::ObjectMeta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const SCHEDULE_API_VERSION: &str = "batch.recur.io/v1";
pub const SCHEDULE_KIND: &str = "CronJob";

/// How a due run interacts with instances that are still active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyPolicy {
    /// Start the new run alongside any active ones.
    #[default]
    Allow,
    /// Skip the run while anything is still active.
    Forbid,
    /// Delete active runs, then start the new one.
    Replace,
}

impl fmt::Display for ConcurrencyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcurrencyPolicy::Allow => write!(f, "allow"),
            ConcurrencyPolicy::Forbid => write!(f, "forbid"),
            ConcurrencyPolicy::Replace => write!(f, "replace"),
        }
    }
}

/// Template every launched instance is stamped from.
///
/// `spec` is opaque to the reconciler and copied verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceTemplate {
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub spec: serde_json::Value,
}

/// User-declared recurring-job definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSpec {
    /// Cron expression, e.g. `"0 * * * *"`.
    pub schedule: String,
    #[serde(default)]
    pub job_template: InstanceTemplate,
    #[serde(default)]
    pub concurrency_policy: ConcurrencyPolicy,
    #[serde(default)]
    pub suspend: Option<bool>,
    /// Occurrences older than this many seconds are abandoned instead of run.
    #[serde(default)]
    pub starting_deadline_seconds: Option<u64>,
    #[serde(default)]
    pub successful_jobs_history_limit: Option<u32>,
    #[serde(default)]
    pub failed_jobs_history_limit: Option<u32>,
}

impl ScheduleSpec {
    pub fn is_suspended(&self) -> bool {
        self.suspend.unwrap_or(false)
    }

    /// Starting deadline as a duration.
    ///
    /// Values too large to represent saturate to the largest duration, which
    /// behaves the same as an effectively unbounded deadline.
    pub fn starting_deadline(&self) -> Option<chrono::Duration> {
        self.starting_deadline_seconds.map(|secs| {
            i64::try_from(secs)
                .ok()
                .and_then(chrono::Duration::try_seconds)
                .unwrap_or(chrono::Duration::MAX)
        })
    }
}

/// Derived status written back by the reconciler.
///
/// Recomputed from observed instances on every pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStatus {
    #[serde(default)]
    pub active: Vec<InstanceRef>,
    #[serde(default)]
    pub last_schedule_time: Option<DateTime<Utc>>,
}

/// A schedule object as held by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub meta: ObjectMeta,
    pub spec: ScheduleSpec,
    #[serde(default)]
    pub status: ScheduleStatus,
}

impl Schedule {
    pub fn new(meta: ObjectMeta, spec: ScheduleSpec) -> Self {
        Self {
            meta,
            spec,
            status: ScheduleStatus::default(),
        }
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
