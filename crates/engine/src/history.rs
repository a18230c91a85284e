// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! History retention for finished instances.

use crate::outcome::{delete_best_effort, DeletionOutcome, DeletionReason};
use recur_adapters::Store;
use recur_core::{Completion, JobInstance};

/// Instances to delete so that at most `limit` of `finished` remain.
///
/// Oldest first by start time; instances that never started count as oldest.
pub fn select_excess(finished: &[JobInstance], limit: Option<u32>) -> Vec<&JobInstance> {
    let Some(limit) = limit else {
        return Vec::new();
    };
    let keep = usize::try_from(limit).unwrap_or(usize::MAX);
    let excess = finished.len().saturating_sub(keep);
    let mut sorted: Vec<&JobInstance> = finished.iter().collect();
    sorted.sort_by_key(|i| i.status.start_time);
    sorted.truncate(excess);
    sorted
}

/// Delete the excess of one bucket.
///
/// Every deletion is attempted even if earlier ones fail.
pub async fn trim_history<S: Store>(
    store: &S,
    finished: &[JobInstance],
    completion: Completion,
    limit: Option<u32>,
) -> Vec<DeletionOutcome> {
    let mut outcomes = Vec::new();
    for instance in select_excess(finished, limit) {
        outcomes.push(
            delete_best_effort(store, instance, DeletionReason::History(completion)).await,
        );
    }
    outcomes
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
