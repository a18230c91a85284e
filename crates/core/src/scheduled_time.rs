// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduled-time annotation codec and deterministic instance naming.
//!
//! The annotation and the instance name are the only durable record of which
//! occurrence an instance represents. Both must stay stable across releases.

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

/// Annotation carrying the logical occurrence an instance was launched for.
pub const SCHEDULED_AT_ANNOTATION: &str = "batch.recur.io/scheduled-at";

#[derive(Debug, Error)]
#[error("invalid scheduled time {raw:?}: {source}")]
pub struct ScheduledTimeError {
    pub raw: String,
    #[source]
    pub source: chrono::ParseError,
}

/// Format an occurrence as RFC 3339 with second precision (`2026-01-01T10:00:00Z`).
pub fn format_scheduled_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn parse_scheduled_time(raw: &str) -> Result<DateTime<Utc>, ScheduledTimeError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|source| ScheduledTimeError {
            raw: raw.to_string(),
            source,
        })
}

/// Name of the instance for `schedule_name` at occurrence `at`.
///
/// `<schedule>-<unix seconds>`; retrying creation for the same occurrence
/// yields the same name and therefore an already-exists conflict.
pub fn instance_name(schedule_name: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}", schedule_name, at.timestamp())
}

#[cfg(test)]
#[path = "scheduled_time_tests.rs"]
mod tests;
