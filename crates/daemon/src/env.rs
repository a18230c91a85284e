// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;

/// Default ceiling between passes for a schedule.
pub const DEFAULT_RESYNC: Duration = Duration::from_secs(300);

/// Resolve state directory: RECUR_STATE_DIR > XDG_STATE_HOME/recur > ~/.local/state/recur
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("RECUR_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("recur"));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/recur"))
}

/// Schedule manifest path, if configured.
pub fn manifest_path() -> Option<PathBuf> {
    std::env::var("RECUR_MANIFEST")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Longest wait between passes for one schedule, even when nothing is due.
pub fn resync_interval() -> Duration {
    std::env::var("RECUR_RESYNC_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RESYNC)
}

/// Timer check interval override
pub fn timer_check_ms() -> Option<Duration> {
    std::env::var("RECUR_TIMER_CHECK_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
