// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Derives schedule status from classified instances.

use crate::classify::ClassifiedInstances;
use recur_core::ScheduleStatus;

/// Status as observed right now.
///
/// The result replaces the stored status wholesale; nothing from the previous
/// status carries over.
pub fn aggregate_status(classified: &ClassifiedInstances) -> ScheduleStatus {
    ScheduleStatus {
        active: classified.active.iter().map(|i| i.reference()).collect(),
        last_schedule_time: classified.last_schedule_time,
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
