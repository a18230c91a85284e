// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Records of what a reconcile pass did.

use crate::calculator::ScheduleError;
use chrono::{DateTime, Utc};
use recur_adapters::{Propagation, Store, StoreError};
use recur_core::{Completion, JobInstance, ObjectKey};
use std::time::Duration;

/// Why the reconciler deleted an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionReason {
    /// Over the history limit for its completion state.
    History(Completion),
    /// Superseded under the replace concurrency policy.
    Replaced,
}

/// One best-effort deletion attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletionOutcome {
    pub instance: ObjectKey,
    pub reason: DeletionReason,
    /// `None` when the instance is gone, including when it already was.
    pub error: Option<StoreError>,
}

impl DeletionOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Delete `instance` with background propagation, logging instead of failing.
pub(crate) async fn delete_best_effort<S: Store>(
    store: &S,
    instance: &JobInstance,
    reason: DeletionReason,
) -> DeletionOutcome {
    let key = instance.key();
    let error = match store.delete_instance(&key, Propagation::Background).await {
        Ok(()) => {
            tracing::info!(instance = %key, ?reason, "deleted instance");
            None
        }
        Err(e) if e.is_not_found() => None,
        Err(e) => {
            tracing::warn!(instance = %key, ?reason, error = %e, "unable to delete instance");
            Some(e)
        }
    };
    DeletionOutcome {
        instance: key,
        reason,
        error,
    }
}

/// How a pass ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PassOutcome {
    /// The schedule no longer exists.
    NotFound,
    Suspended,
    /// The cron expression cannot produce a usable occurrence.
    ScheduleFailed(ScheduleError),
    /// Nothing due.
    Idle,
    /// The missed occurrence is past its starting deadline.
    TooLate { scheduled_at: DateTime<Utc> },
    /// Skipped because an instance is still active under the forbid policy.
    Blocked { scheduled_at: DateTime<Utc> },
    Created {
        instance: ObjectKey,
        scheduled_at: DateTime<Utc>,
    },
    /// An instance for this occurrence was created by an earlier pass.
    AlreadyExists {
        instance: ObjectKey,
        scheduled_at: DateTime<Utc>,
    },
    /// Creation failed; the next pass will try again.
    CreateFailed {
        instance: ObjectKey,
        scheduled_at: DateTime<Utc>,
        error: StoreError,
    },
}

/// Summary of one reconcile pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    pub outcome: PassOutcome,
    /// When to run the next pass; `None` waits for an external change.
    pub requeue_after: Option<Duration>,
    pub next_run: Option<DateTime<Utc>>,
    pub deletions: Vec<DeletionOutcome>,
}

impl PassReport {
    pub(crate) fn finished(outcome: PassOutcome, deletions: Vec<DeletionOutcome>) -> Self {
        Self {
            outcome,
            requeue_after: None,
            next_run: None,
            deletions,
        }
    }

    /// Deletion attempts that failed.
    pub fn failed_deletions(&self) -> impl Iterator<Item = &DeletionOutcome> {
        self.deletions.iter().filter(|d| !d.is_ok())
    }

    /// Whether the pass launched a new instance or found it already launched.
    pub fn launched(&self) -> bool {
        matches!(
            self.outcome,
            PassOutcome::Created { .. } | PassOutcome::AlreadyExists { .. }
        )
    }
}
