// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recurring job daemon library
//!
//! Configuration, manifest loading and the lifecycle that drives the
//! reconciler for every stored schedule. The `recurd` binary is a thin
//! signal loop around [`lifecycle::DaemonState`].

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod env;
pub mod lifecycle;
pub mod manifest;

pub use lifecycle::{
    apply_manifest, startup, Config, DaemonState, Dispatcher, LifecycleError, ManifestSync,
};
pub use manifest::{Manifest, ManifestError, ScheduleEntry, TemplateEntry};
