// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    unset     = { None,        false },
    explicit  = { Some(false), false },
    suspended = { Some(true),  true },
)]
fn suspended(suspend: Option<bool>, expected: bool) {
    let spec = ScheduleSpec {
        suspend,
        ..ScheduleSpec::default()
    };
    assert_eq!(spec.is_suspended(), expected);
}

#[test]
fn starting_deadline_in_seconds() {
    let spec = ScheduleSpec {
        starting_deadline_seconds: Some(30),
        ..ScheduleSpec::default()
    };
    assert_eq!(spec.starting_deadline(), Some(chrono::Duration::seconds(30)));
}

#[test]
fn starting_deadline_saturates() {
    let spec = ScheduleSpec {
        starting_deadline_seconds: Some(u64::MAX),
        ..ScheduleSpec::default()
    };
    assert_eq!(spec.starting_deadline(), Some(chrono::Duration::MAX));
}

#[test]
fn concurrency_policy_defaults_to_allow() {
    let spec: ScheduleSpec = serde_json::from_str(r#"{"schedule":"* * * * *"}"#).unwrap();
    assert_eq!(spec.concurrency_policy, ConcurrencyPolicy::Allow);
    assert!(spec.job_template.labels.is_empty());
}

#[yare::parameterized(
    allow   = { "\"allow\"",   ConcurrencyPolicy::Allow },
    forbid  = { "\"forbid\"",  ConcurrencyPolicy::Forbid },
    replace = { "\"replace\"", ConcurrencyPolicy::Replace },
)]
fn concurrency_policy_serde(json: &str, expected: ConcurrencyPolicy) {
    let policy: ConcurrencyPolicy = serde_json::from_str(json).unwrap();
    assert_eq!(policy, expected);
    assert_eq!(format!("\"{}\"", policy), json);
}
