// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use recur_core::{
    format_scheduled_time, instance_name, InstanceStatus, JobInstance, ObjectMeta, OwnerRef,
    Schedule, SCHEDULED_AT_ANNOTATION,
};

/// Build the instance for `schedule`'s occurrence at `scheduled_at`.
///
/// The name is derived from the schedule name and the occurrence, so two
/// passes for the same occurrence build the same instance.
pub fn build_instance(schedule: &Schedule, scheduled_at: DateTime<Utc>) -> JobInstance {
    let template = &schedule.spec.job_template;
    let mut meta = ObjectMeta::new(
        schedule.meta.namespace.clone(),
        instance_name(&schedule.meta.name, scheduled_at),
    );
    meta.labels = template.labels.clone();
    meta.annotations = template.annotations.clone();
    meta.annotations.insert(
        SCHEDULED_AT_ANNOTATION.to_string(),
        format_scheduled_time(scheduled_at),
    );
    meta.owner_references.push(OwnerRef::controller_for(schedule));

    JobInstance {
        meta,
        spec: template.spec.clone(),
        status: InstanceStatus::default(),
    }
}

#[cfg(test)]
#[path = "construct_tests.rs"]
mod tests;
