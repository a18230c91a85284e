// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object metadata shared by schedules and instances.

use crate::key::ObjectKey;
use crate::owner::OwnerRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata common to every stored object.
///
/// `uid`, `resource_version` and `creation_timestamp` are assigned by the
/// store; callers leave them at their defaults when submitting a new object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub uid: String,
    /// Bumped by the store on every write; used for optimistic concurrency.
    #[serde(default)]
    pub resource_version: u64,
    #[serde(default)]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub owner_references: Vec<OwnerRef>,
}

impl ObjectMeta {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(self.namespace.clone(), self.name.clone())
    }

    /// The owner reference marked as controller, if any.
    pub fn controller_ref(&self) -> Option<&OwnerRef> {
        self.owner_references.iter().find(|r| r.controller)
    }
}
