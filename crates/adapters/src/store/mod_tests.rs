// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn key(name: &str) -> ObjectKey {
    ObjectKey::new("default", name)
}

#[parameterized(
    not_found = { StateError::NotFound { kind: "schedule", key: key("a") }, StoreError::NotFound(key("a")) },
    already_exists = { StateError::AlreadyExists { kind: "instance", key: key("b") }, StoreError::AlreadyExists(key("b")) },
)]
fn state_errors_map_to_store_errors(input: StateError, expected: StoreError) {
    assert_eq!(StoreError::from(input), expected);
}

#[test]
fn conflict_carries_versions_in_message() {
    let err = StoreError::from(StateError::Conflict {
        kind: "schedule",
        key: key("a"),
        expected: 3,
        actual: 5,
    });

    match &err {
        StoreError::Conflict { key: k, message } => {
            assert_eq!(k, &key("a"));
            assert_eq!(message, "expected version 3, found 5");
        }
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "conflict writing default/a: expected version 3, found 5"
    );
}

#[parameterized(
    not_found = { StoreError::NotFound(key("a")), true, false },
    already_exists = { StoreError::AlreadyExists(key("a")), false, true },
    backend = { StoreError::Backend("down".to_string()), false, false },
)]
fn error_predicates(err: StoreError, not_found: bool, already_exists: bool) {
    assert_eq!(err.is_not_found(), not_found);
    assert_eq!(err.is_already_exists(), already_exists);
}
