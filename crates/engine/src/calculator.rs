// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Occurrence calculation for cron schedules.
//!
//! Given the last recorded occurrence (or the schedule's creation time) and
//! the current time, finds the most recent occurrence that should already have
//! run and the next one still ahead.

use chrono::{DateTime, Duration, Utc};
use std::str::FromStr;
use thiserror::Error;

/// Upper bound on occurrences walked between `earliest` and `now`.
pub const MAX_MISSED_OCCURRENCES: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("unparseable schedule {expr:?}: {reason}")]
    Invalid { expr: String, reason: String },
    #[error("too many missed start times (> {limit}); check clock skew or set a starting deadline")]
    TooManyMissed { limit: usize },
    #[error("schedule {expr:?} has no occurrence after {after}")]
    Exhausted { expr: String, after: DateTime<Utc> },
}

/// Result of [`next_schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrences {
    /// Most recent occurrence in `(earliest, now]`, if any.
    pub last_missed: Option<DateTime<Utc>>,
    /// First occurrence strictly after `now`.
    pub next: DateTime<Utc>,
}

/// Inputs to [`next_schedule`], borrowed from a schedule and its status.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleWindow<'a> {
    pub expr: &'a str,
    pub last_schedule_time: Option<DateTime<Utc>>,
    pub creation_time: DateTime<Utc>,
    pub starting_deadline: Option<Duration>,
}

/// Parse a cron expression.
///
/// Standard five-field expressions (`min hour dom month dow`, Sunday = 0 or 7)
/// are accepted alongside the six/seven-field form with seconds, and
/// `@hourly`-style shorthands. Six/seven-field expressions use the `cron`
/// crate's own weekday numbering (Sunday = 1).
pub fn parse_cron(expr: &str) -> Result<cron::Schedule, ScheduleError> {
    let invalid = |reason: String| ScheduleError::Invalid {
        expr: expr.to_string(),
        reason,
    };
    let fields: Vec<&str> = expr.split_whitespace().collect();
    let normalized = match fields.as_slice() {
        [minute, hour, dom, month, dow] => {
            let dow = standard_weekdays(dow).map_err(invalid)?;
            format!("0 {minute} {hour} {dom} {month} {dow}")
        }
        _ => expr.trim().to_string(),
    };
    cron::Schedule::from_str(&normalized).map_err(|e| invalid(e.to_string()))
}

/// Rewrite a standard day-of-week field (0-7, Sunday = 0 or 7) into the
/// `cron` crate's numbering (1-7, Sunday = 1).
///
/// Numeric ranges, steps and lists are expanded into an explicit list; day
/// names are passed through untouched.
fn standard_weekdays(field: &str) -> Result<String, String> {
    if field == "*" || field == "?" {
        return Ok(field.to_string());
    }
    let mut days = Vec::new();
    let mut named = Vec::new();
    for item in field.split(',') {
        match weekday_item(item)? {
            Some(expanded) => days.extend(expanded),
            None => named.push(item.to_string()),
        }
    }
    days.sort_unstable();
    days.dedup();
    let mut out: Vec<String> = days.iter().map(|d| (d + 1).to_string()).collect();
    out.extend(named);
    Ok(out.join(","))
}

/// Standard weekdays (0-6) selected by one list item, or `None` for names.
fn weekday_item(item: &str) -> Result<Option<Vec<u32>>, String> {
    let (range, step) = match item.split_once('/') {
        Some((range, step)) => {
            let step: u32 = step
                .parse()
                .map_err(|_| format!("invalid day-of-week step {step:?}"))?;
            if step == 0 {
                return Err("day-of-week step must be positive".to_string());
            }
            (range, Some(step))
        }
        None => (item, None),
    };
    if !range.chars().all(|c| c.is_ascii_digit() || c == '-' || c == '*') {
        return Ok(None);
    }
    let number = |s: &str| -> Result<u32, String> {
        match s.parse::<u32>() {
            Ok(n) if n <= 7 => Ok(n),
            _ => Err(format!("day-of-week {s:?} out of range 0-7")),
        }
    };
    let (start, end) = if range == "*" {
        (0, 6)
    } else if let Some((a, b)) = range.split_once('-') {
        (number(a)?, number(b)?)
    } else {
        let n = number(range)?;
        // `n/step` runs from n to the end of the week
        (n, if step.is_some() { 6.max(n) } else { n })
    };
    if start > end {
        return Err(format!("day-of-week range {range:?} is reversed"));
    }
    let step = usize::try_from(step.unwrap_or(1)).unwrap_or(usize::MAX);
    Ok(Some((start..=end).step_by(step).map(|d| d % 7).collect()))
}

/// Compute the most recent missed occurrence and the next occurrence.
///
/// Occurrences older than `now - starting_deadline` are never considered
/// missed. Walking more than [`MAX_MISSED_OCCURRENCES`] occurrences fails
/// with [`ScheduleError::TooManyMissed`].
pub fn next_schedule(
    window: ScheduleWindow<'_>,
    now: DateTime<Utc>,
) -> Result<Occurrences, ScheduleError> {
    let schedule = parse_cron(window.expr)?;

    let mut earliest = window.last_schedule_time.unwrap_or(window.creation_time);
    if let Some(cutoff) = window
        .starting_deadline
        .and_then(|deadline| now.checked_sub_signed(deadline))
    {
        earliest = earliest.max(cutoff);
    }

    let next = schedule
        .after(&now)
        .next()
        .ok_or_else(|| ScheduleError::Exhausted {
            expr: window.expr.to_string(),
            after: now,
        })?;

    if earliest > now {
        return Ok(Occurrences {
            last_missed: None,
            next,
        });
    }

    let mut last_missed = None;
    let mut starts = 0;
    for t in schedule.after(&earliest) {
        if t > now {
            break;
        }
        last_missed = Some(t);
        starts += 1;
        if starts > MAX_MISSED_OCCURRENCES {
            return Err(ScheduleError::TooManyMissed {
                limit: MAX_MISSED_OCCURRENCES,
            });
        }
    }

    Ok(Occurrences { last_missed, next })
}

#[cfg(test)]
#[path = "calculator_tests.rs"]
mod tests;
