// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launched job instances and their completion state.

use crate::key::ObjectKey;
use crate::meta::ObjectMeta;
use crate::scheduled_time::{parse_scheduled_time, ScheduledTimeError, SCHEDULED_AT_ANNOTATION};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const INSTANCE_API_VERSION: &str = "batch/v1";
pub const INSTANCE_KIND: &str = "Job";

/// Condition types reported by the execution subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    Complete,
    Failed,
    Suspended,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceCondition {
    pub kind: ConditionKind,
    pub status: ConditionStatus,
}

impl InstanceCondition {
    pub fn new(kind: ConditionKind, status: ConditionStatus) -> Self {
        Self { kind, status }
    }
}

/// Observed execution status, written only by the execution subsystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceStatus {
    #[serde(default)]
    pub conditions: Vec<InstanceCondition>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// Number of running workers, informational only.
    #[serde(default)]
    pub active: u32,
}

/// Terminal state of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    Ongoing,
    Succeeded,
    Failed,
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Ongoing => write!(f, "ongoing"),
            Completion::Succeeded => write!(f, "succeeded"),
            Completion::Failed => write!(f, "failed"),
        }
    }
}

/// One launched unit of work representing a single scheduled occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobInstance {
    pub meta: ObjectMeta,
    #[serde(default)]
    pub spec: serde_json::Value,
    #[serde(default)]
    pub status: InstanceStatus,
}

impl JobInstance {
    pub fn key(&self) -> ObjectKey {
        self.meta.key()
    }

    /// Classify the instance by the first true `Complete` or `Failed` condition.
    pub fn completion(&self) -> Completion {
        self.status
            .conditions
            .iter()
            .filter(|c| c.status == ConditionStatus::True)
            .find_map(|c| match c.kind {
                ConditionKind::Complete => Some(Completion::Succeeded),
                ConditionKind::Failed => Some(Completion::Failed),
                _ => None,
            })
            .unwrap_or(Completion::Ongoing)
    }

    /// The occurrence this instance was launched for.
    ///
    /// `Ok(None)` when the annotation is absent; an error when it is present
    /// but not a valid timestamp.
    pub fn scheduled_time(&self) -> Result<Option<DateTime<Utc>>, ScheduledTimeError> {
        match self.meta.annotations.get(SCHEDULED_AT_ANNOTATION) {
            None => Ok(None),
            Some(raw) if raw.is_empty() => Ok(None),
            Some(raw) => parse_scheduled_time(raw).map(Some),
        }
    }

    pub fn reference(&self) -> InstanceRef {
        InstanceRef {
            api_version: INSTANCE_API_VERSION.to_string(),
            kind: INSTANCE_KIND.to_string(),
            namespace: self.meta.namespace.clone(),
            name: self.meta.name.clone(),
            uid: self.meta.uid.clone(),
        }
    }
}

/// Reference to an instance, as listed in a schedule's status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceRef {
    pub api_version: String,
    pub kind: String,
    pub namespace: String,
    pub name: String,
    pub uid: String,
}

#[cfg(test)]
#[path = "instance_tests.rs"]
mod tests;
