// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrency policy enforcement for a due run.

use crate::outcome::{delete_best_effort, DeletionOutcome, DeletionReason};
use recur_adapters::Store;
use recur_core::{ConcurrencyPolicy, JobInstance};

/// What to do with a due run given the active instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Create the new instance.
    Proceed,
    /// Skip this occurrence.
    Blocked,
    /// Delete the active instances, then create the new one.
    Replace,
}

pub fn admit(policy: ConcurrencyPolicy, active: &[JobInstance]) -> Admission {
    if active.is_empty() {
        return Admission::Proceed;
    }
    match policy {
        ConcurrencyPolicy::Allow => Admission::Proceed,
        ConcurrencyPolicy::Forbid => Admission::Blocked,
        ConcurrencyPolicy::Replace => Admission::Replace,
    }
}

/// Apply `policy`, deleting active instances when replacing.
///
/// Returns whether the run may proceed. Replace deletions are best-effort:
/// failures are reported but never block the new run.
pub async fn enforce<S: Store>(
    store: &S,
    policy: ConcurrencyPolicy,
    active: &[JobInstance],
) -> (bool, Vec<DeletionOutcome>) {
    match admit(policy, active) {
        Admission::Proceed => (true, Vec::new()),
        Admission::Blocked => {
            tracing::debug!(active = active.len(), "concurrency policy blocks run, skipping");
            (false, Vec::new())
        }
        Admission::Replace => {
            let mut outcomes = Vec::with_capacity(active.len());
            for instance in active {
                outcomes.push(delete_best_effort(store, instance, DeletionReason::Replaced).await);
            }
            (true, outcomes)
        }
    }
}

#[cfg(test)]
#[path = "concurrency_tests.rs"]
mod tests;
