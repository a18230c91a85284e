// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable duration formatting for log fields.

use std::time::Duration;

/// Format a duration compactly: `"45s"`, `"2m5s"`, `"1h"`, `"3d2h"`.
///
/// At most two units are shown; sub-second precision is dropped.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let units = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

    let mut parts = Vec::with_capacity(2);
    let mut rest = secs;
    for (size, suffix) in units {
        if rest >= size {
            parts.push(format!("{}{}", rest / size, suffix));
            rest %= size;
        } else if !parts.is_empty() {
            // only adjacent units
            break;
        }
        if parts.len() == 2 {
            break;
        }
    }

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.concat()
    }
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
