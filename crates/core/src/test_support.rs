// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test builders for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{
    format_scheduled_time, instance_name, ConcurrencyPolicy, ConditionKind, ConditionStatus,
    InstanceCondition, InstanceStatus, JobInstance, ObjectMeta, OwnerRef, Schedule,
    ScheduleSpec, SCHEDULED_AT_ANNOTATION,
};
use chrono::{DateTime, Utc};

pub const TEST_NAMESPACE: &str = "default";

// ── Schedules ───────────────────────────────────────────────────────────────

pub struct ScheduleBuilder {
    schedule: Schedule,
}

/// Start building a schedule in [`TEST_NAMESPACE`] with uid `"{name}-uid"`.
pub fn schedule(name: &str, cron: &str) -> ScheduleBuilder {
    let mut meta = ObjectMeta::new(TEST_NAMESPACE, name);
    meta.uid = format!("{}-uid", name);
    ScheduleBuilder {
        schedule: Schedule::new(
            meta,
            ScheduleSpec {
                schedule: cron.to_string(),
                ..ScheduleSpec::default()
            },
        ),
    }
}

impl ScheduleBuilder {
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.schedule.meta.creation_timestamp = Some(at);
        self
    }

    pub fn policy(mut self, policy: ConcurrencyPolicy) -> Self {
        self.schedule.spec.concurrency_policy = policy;
        self
    }

    pub fn suspend(mut self, suspend: bool) -> Self {
        self.schedule.spec.suspend = Some(suspend);
        self
    }

    pub fn starting_deadline_seconds(mut self, secs: u64) -> Self {
        self.schedule.spec.starting_deadline_seconds = Some(secs);
        self
    }

    pub fn success_limit(mut self, limit: u32) -> Self {
        self.schedule.spec.successful_jobs_history_limit = Some(limit);
        self
    }

    pub fn failure_limit(mut self, limit: u32) -> Self {
        self.schedule.spec.failed_jobs_history_limit = Some(limit);
        self
    }

    pub fn template_label(mut self, key: &str, value: &str) -> Self {
        self.schedule
            .spec
            .job_template
            .labels
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn template_annotation(mut self, key: &str, value: &str) -> Self {
        self.schedule
            .spec
            .job_template
            .annotations
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn template_spec(mut self, spec: serde_json::Value) -> Self {
        self.schedule.spec.job_template.spec = spec;
        self
    }

    pub fn last_schedule_time(mut self, at: DateTime<Utc>) -> Self {
        self.schedule.status.last_schedule_time = Some(at);
        self
    }

    pub fn build(self) -> Schedule {
        self.schedule
    }
}

// ── Instances ───────────────────────────────────────────────────────────────

pub struct InstanceBuilder {
    instance: JobInstance,
}

/// Start building an instance owned by `owner` for the occurrence `scheduled_at`.
///
/// The instance is named the way the reconciler names it and carries the
/// scheduled-time annotation; it starts out ongoing.
pub fn instance(owner: &Schedule, scheduled_at: DateTime<Utc>) -> InstanceBuilder {
    let mut meta = ObjectMeta::new(
        owner.meta.namespace.clone(),
        instance_name(&owner.meta.name, scheduled_at),
    );
    meta.uid = format!("{}-uid", meta.name);
    meta.annotations.insert(
        SCHEDULED_AT_ANNOTATION.to_string(),
        format_scheduled_time(scheduled_at),
    );
    meta.owner_references.push(OwnerRef::controller_for(owner));
    InstanceBuilder {
        instance: JobInstance {
            meta,
            spec: serde_json::Value::Null,
            status: InstanceStatus::default(),
        },
    }
}

impl InstanceBuilder {
    pub fn name(mut self, name: &str) -> Self {
        self.instance.meta.name = name.to_string();
        self
    }

    pub fn started_at(mut self, at: DateTime<Utc>) -> Self {
        self.instance.status.start_time = Some(at);
        self
    }

    pub fn succeeded(self) -> Self {
        self.condition(ConditionKind::Complete, ConditionStatus::True)
    }

    pub fn failed(self) -> Self {
        self.condition(ConditionKind::Failed, ConditionStatus::True)
    }

    pub fn condition(mut self, kind: ConditionKind, status: ConditionStatus) -> Self {
        self.instance
            .status
            .conditions
            .push(InstanceCondition::new(kind, status));
        self
    }

    pub fn annotation(mut self, key: &str, value: &str) -> Self {
        self.instance
            .meta
            .annotations
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn without_scheduled_time(mut self) -> Self {
        self.instance.meta.annotations.remove(SCHEDULED_AT_ANNOTATION);
        self
    }

    pub fn build(self) -> JobInstance {
        self.instance
    }
}
