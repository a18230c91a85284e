// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The reconcile pass for a single schedule.

use crate::calculator::{next_schedule, ScheduleWindow};
use crate::classify::classify;
use crate::concurrency::enforce;
use crate::construct::build_instance;
use crate::error::ReconcileError;
use crate::history::trim_history;
use crate::outcome::{DeletionOutcome, PassOutcome, PassReport};
use crate::status::aggregate_status;
use chrono::{DateTime, Utc};
use recur_adapters::Store;
use recur_core::{format_duration, Clock, Completion, ObjectKey};
use std::time::Duration;
use tracing::Instrument;

/// Drives reconcile passes against a store.
///
/// Holds no state between passes: every decision is re-derived from what the
/// store returns and the clock's current time. Callers must not run two
/// passes for the same schedule concurrently; distinct schedules may be
/// reconciled in parallel.
#[derive(Clone)]
pub struct Reconciler<S: Store, C: Clock> {
    store: S,
    clock: C,
}

impl<S: Store, C: Clock> Reconciler<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run one pass for the schedule at `key`.
    ///
    /// An `Err` means status could not be observed or recorded and the whole
    /// pass should be retried. Every other failure is folded into the report.
    pub async fn reconcile(&self, key: &ObjectKey) -> Result<PassReport, ReconcileError> {
        self.pass(key)
            .instrument(tracing::info_span!("reconcile", schedule = %key))
            .await
    }

    async fn pass(&self, key: &ObjectKey) -> Result<PassReport, ReconcileError> {
        let mut schedule = match self.store.get_schedule(key).await {
            Ok(schedule) => schedule,
            Err(e) if e.is_not_found() => {
                tracing::debug!("schedule not found, nothing to do");
                return Ok(PassReport::finished(PassOutcome::NotFound, Vec::new()));
            }
            Err(source) => {
                return Err(ReconcileError::Fetch {
                    key: key.clone(),
                    source,
                })
            }
        };
        let now = self.clock.now();

        let instances =
            self.store
                .list_owned_instances(key)
                .await
                .map_err(|source| ReconcileError::List {
                    key: key.clone(),
                    source,
                })?;
        let classified = classify(instances);
        tracing::debug!(
            active = classified.active.len(),
            succeeded = classified.succeeded.len(),
            failed = classified.failed.len(),
            "instance count"
        );

        schedule.status = aggregate_status(&classified);
        let schedule = self
            .store
            .update_schedule_status(&schedule)
            .await
            .map_err(|source| ReconcileError::UpdateStatus {
                key: key.clone(),
                source,
            })?;

        let spec = &schedule.spec;
        let mut deletions = trim_history(
            &self.store,
            &classified.succeeded,
            Completion::Succeeded,
            spec.successful_jobs_history_limit,
        )
        .await;
        deletions.extend(
            trim_history(
                &self.store,
                &classified.failed,
                Completion::Failed,
                spec.failed_jobs_history_limit,
            )
            .await,
        );

        if spec.is_suspended() {
            tracing::debug!("schedule suspended, skipping");
            return Ok(PassReport::finished(PassOutcome::Suspended, deletions));
        }

        let window = ScheduleWindow {
            expr: &spec.schedule,
            last_schedule_time: schedule.status.last_schedule_time,
            creation_time: schedule.meta.creation_timestamp.unwrap_or(now),
            starting_deadline: spec.starting_deadline(),
        };
        let occurrences = match next_schedule(window, now) {
            Ok(occurrences) => occurrences,
            Err(e) => {
                tracing::error!(expr = spec.schedule.as_str(), error = %e, "unable to figure out schedule");
                return Ok(PassReport::finished(PassOutcome::ScheduleFailed(e), deletions));
            }
        };

        let requeue_after = (occurrences.next - now).to_std().unwrap_or(Duration::ZERO);
        let report = Requeue {
            requeue_after,
            next_run: occurrences.next,
        };

        let Some(scheduled_at) = occurrences.last_missed else {
            tracing::debug!(
                next_run = %occurrences.next,
                requeue_after = %format_duration(requeue_after),
                "no missed run, sleeping until next"
            );
            return Ok(report.finish(PassOutcome::Idle, deletions));
        };

        if let Some(deadline) = spec.starting_deadline() {
            let too_late = scheduled_at
                .checked_add_signed(deadline)
                .is_some_and(|cutoff| cutoff < now);
            if too_late {
                tracing::debug!(%scheduled_at, "missed starting deadline for last run, sleeping until next");
                return Ok(report.finish(PassOutcome::TooLate { scheduled_at }, deletions));
            }
        }

        let (proceed, replaced) =
            enforce(&self.store, spec.concurrency_policy, &classified.active).await;
        deletions.extend(replaced);
        if !proceed {
            tracing::debug!(
                %scheduled_at,
                policy = %spec.concurrency_policy,
                "run blocked by active instances"
            );
            return Ok(report.finish(PassOutcome::Blocked { scheduled_at }, deletions));
        }

        let instance = build_instance(&schedule, scheduled_at);
        let instance_key = instance.key();
        let outcome = match self.store.create_instance(&instance).await {
            Ok(_) => {
                tracing::info!(instance = %instance_key, %scheduled_at, "created instance for run");
                PassOutcome::Created {
                    instance: instance_key,
                    scheduled_at,
                }
            }
            Err(e) if e.is_already_exists() => {
                tracing::debug!(instance = %instance_key, "instance for run already exists");
                PassOutcome::AlreadyExists {
                    instance: instance_key,
                    scheduled_at,
                }
            }
            Err(error) => {
                tracing::error!(instance = %instance_key, error = %error, "unable to create instance for run");
                PassOutcome::CreateFailed {
                    instance: instance_key,
                    scheduled_at,
                    error,
                }
            }
        };

        tracing::debug!(
            next_run = %occurrences.next,
            requeue_after = %format_duration(requeue_after),
            "requeueing until next run"
        );
        Ok(report.finish(outcome, deletions))
    }
}

/// Requeue computed from the next occurrence.
struct Requeue {
    requeue_after: Duration,
    next_run: DateTime<Utc>,
}

impl Requeue {
    fn finish(&self, outcome: PassOutcome, deletions: Vec<DeletionOutcome>) -> PassReport {
        PassReport {
            outcome,
            requeue_after: Some(self.requeue_after),
            next_run: Some(self.next_run),
            deletions,
        }
    }
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
