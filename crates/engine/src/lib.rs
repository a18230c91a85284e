// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Recur reconcile engine

pub mod calculator;
mod classify;
mod concurrency;
mod construct;
mod error;
mod history;
mod outcome;
mod reconciler;
mod scheduler;
mod status;

pub use calculator::{
    next_schedule, parse_cron, Occurrences, ScheduleError, ScheduleWindow, MAX_MISSED_OCCURRENCES,
};
pub use classify::{classify, ClassifiedInstances};
pub use concurrency::{admit, enforce, Admission};
pub use construct::build_instance;
pub use error::ReconcileError;
pub use history::{select_excess, trim_history};
pub use outcome::{DeletionOutcome, DeletionReason, PassOutcome, PassReport};
pub use reconciler::Reconciler;
pub use scheduler::Scheduler;
pub use status::aggregate_status;
