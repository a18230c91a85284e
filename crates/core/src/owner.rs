// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owner references from instances back to their schedule.
//!
//! Ownership always points from the instance to the schedule, never the
//! other way round, so there are no ownership cycles. Stores use
//! [`owner_index_key`] to maintain the reverse index the reconciler lists by.

use crate::meta::ObjectMeta;
use crate::schedule::{Schedule, SCHEDULE_API_VERSION, SCHEDULE_KIND};
use serde::{Deserialize, Serialize};

/// Reference from an owned object to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerRef {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub uid: String,
    /// At most one owner reference per object is the controller.
    #[serde(default)]
    pub controller: bool,
    #[serde(default)]
    pub block_owner_deletion: bool,
}

impl OwnerRef {
    /// Controller reference pointing at `schedule`.
    pub fn controller_for(schedule: &Schedule) -> Self {
        Self {
            api_version: SCHEDULE_API_VERSION.to_string(),
            kind: SCHEDULE_KIND.to_string(),
            name: schedule.meta.name.clone(),
            uid: schedule.meta.uid.clone(),
            controller: true,
            block_owner_deletion: true,
        }
    }

    /// Returns true if this reference points at a schedule object.
    pub fn is_schedule(&self) -> bool {
        self.api_version == SCHEDULE_API_VERSION && self.kind == SCHEDULE_KIND
    }
}

/// Owner-index value for an object: the name of its controlling schedule.
///
/// Objects without a controller, or controlled by something other than a
/// schedule, are not indexed.
pub fn owner_index_key(meta: &ObjectMeta) -> Option<&str> {
    meta.controller_ref()
        .filter(|owner| owner.is_schedule())
        .map(|owner| owner.name.as_str())
}

#[cfg(test)]
#[path = "owner_tests.rs"]
mod tests;
