// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized object state: schedules, instances and the owner index.

use chrono::{DateTime, Utc};
use recur_core::{owner_index_key, InstanceStatus, JobInstance, ObjectKey, Schedule};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

/// Errors from state mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("{kind} {key} not found")]
    NotFound { kind: &'static str, key: ObjectKey },
    #[error("{kind} {key} already exists")]
    AlreadyExists { kind: &'static str, key: ObjectKey },
    #[error("{kind} {key} was modified: expected version {expected}, found {actual}")]
    Conflict {
        kind: &'static str,
        key: ObjectKey,
        expected: u64,
        actual: u64,
    },
}

/// All stored objects.
///
/// Maps are keyed by the scoped `"{namespace}/{name}"` string so snapshots
/// serialize as plain JSON objects. The owner index is derived and rebuilt
/// after loading.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default)]
    pub schedules: BTreeMap<String, Schedule>,
    #[serde(default)]
    pub instances: BTreeMap<String, JobInstance>,
    /// Last resource version handed out.
    #[serde(default)]
    pub version: u64,
    #[serde(skip)]
    owner_index: HashMap<ObjectKey, BTreeSet<String>>,
}

impl StoreState {
    pub fn get_schedule(&self, key: &ObjectKey) -> Option<&Schedule> {
        self.schedules.get(&key.to_string())
    }

    /// Create a schedule, or replace the spec and labels of an existing one.
    ///
    /// Identity (uid, creation time) and status survive an update, so an
    /// edited schedule keeps owning the instances it launched.
    pub fn apply_schedule(
        &mut self,
        mut schedule: Schedule,
        uid: String,
        now: DateTime<Utc>,
    ) -> Schedule {
        let key = schedule.meta.key().to_string();
        let version = self.bump();
        let stored = match self.schedules.remove(&key) {
            Some(mut existing) => {
                existing.meta.labels = schedule.meta.labels;
                existing.meta.annotations = schedule.meta.annotations;
                existing.spec = schedule.spec;
                existing.meta.resource_version = version;
                existing
            }
            None => {
                schedule.meta.uid = uid;
                schedule.meta.creation_timestamp.get_or_insert(now);
                schedule.meta.resource_version = version;
                schedule
            }
        };
        self.schedules.insert(key, stored.clone());
        stored
    }

    /// Insert a schedule as given, replacing any existing one.
    ///
    /// Only the resource version is assigned; used to restore or seed
    /// objects whose identity is already known.
    pub fn insert_schedule(&mut self, mut schedule: Schedule) -> Schedule {
        schedule.meta.resource_version = self.bump();
        self.schedules
            .insert(schedule.meta.key().to_string(), schedule.clone());
        schedule
    }

    /// Remove a schedule and every instance it controls.
    pub fn remove_schedule(&mut self, key: &ObjectKey) -> Result<Schedule, StateError> {
        let schedule = self
            .schedules
            .remove(&key.to_string())
            .ok_or_else(|| StateError::NotFound {
                kind: "schedule",
                key: key.clone(),
            })?;
        if let Some(owned) = self.owner_index.remove(key) {
            for instance_key in owned {
                self.instances.remove(&instance_key);
            }
        }
        self.bump();
        Ok(schedule)
    }

    /// Replace the status of a schedule.
    ///
    /// `schedule.meta.resource_version` must match the stored version;
    /// otherwise the write lost a race and is rejected.
    pub fn update_schedule_status(&mut self, schedule: &Schedule) -> Result<Schedule, StateError> {
        let key = schedule.meta.key();
        let version = self.version + 1;
        let stored = self
            .schedules
            .get_mut(&key.to_string())
            .ok_or_else(|| StateError::NotFound {
                kind: "schedule",
                key: key.clone(),
            })?;
        if stored.meta.resource_version != schedule.meta.resource_version {
            return Err(StateError::Conflict {
                kind: "schedule",
                key,
                expected: schedule.meta.resource_version,
                actual: stored.meta.resource_version,
            });
        }
        stored.status = schedule.status.clone();
        stored.meta.resource_version = version;
        let updated = stored.clone();
        self.version = version;
        Ok(updated)
    }

    pub fn create_instance(
        &mut self,
        mut instance: JobInstance,
        uid: String,
        now: DateTime<Utc>,
    ) -> Result<JobInstance, StateError> {
        let key = instance.key();
        let scoped = key.to_string();
        if self.instances.contains_key(&scoped) {
            return Err(StateError::AlreadyExists {
                kind: "instance",
                key,
            });
        }
        instance.meta.uid = uid;
        instance.meta.creation_timestamp = Some(now);
        instance.meta.resource_version = self.bump();
        self.index(&instance);
        self.instances.insert(scoped, instance.clone());
        Ok(instance)
    }

    pub fn delete_instance(&mut self, key: &ObjectKey) -> Result<JobInstance, StateError> {
        let instance = self
            .instances
            .remove(&key.to_string())
            .ok_or_else(|| StateError::NotFound {
                kind: "instance",
                key: key.clone(),
            })?;
        self.unindex(&instance);
        self.bump();
        Ok(instance)
    }

    /// Record execution progress for an instance.
    pub fn update_instance_status(
        &mut self,
        key: &ObjectKey,
        status: InstanceStatus,
    ) -> Result<JobInstance, StateError> {
        let version = self.version + 1;
        let stored = self
            .instances
            .get_mut(&key.to_string())
            .ok_or_else(|| StateError::NotFound {
                kind: "instance",
                key: key.clone(),
            })?;
        stored.status = status;
        stored.meta.resource_version = version;
        let updated = stored.clone();
        self.version = version;
        Ok(updated)
    }

    /// Instances controlled by the schedule at `owner`, in name order.
    pub fn instances_owned_by(&self, owner: &ObjectKey) -> Vec<JobInstance> {
        self.owner_index
            .get(owner)
            .into_iter()
            .flatten()
            .filter_map(|k| self.instances.get(k))
            .cloned()
            .collect()
    }

    /// Recompute the owner index from the instance map.
    pub fn rebuild_index(&mut self) {
        self.owner_index.clear();
        let instances: Vec<JobInstance> = self.instances.values().cloned().collect();
        for instance in &instances {
            self.index(instance);
        }
    }

    fn index(&mut self, instance: &JobInstance) {
        if let Some(owner) = owner_index_key(&instance.meta) {
            let owner = ObjectKey::new(instance.meta.namespace.clone(), owner);
            self.owner_index
                .entry(owner)
                .or_default()
                .insert(instance.key().to_string());
        }
    }

    fn unindex(&mut self, instance: &JobInstance) {
        if let Some(owner) = owner_index_key(&instance.meta) {
            let owner = ObjectKey::new(instance.meta.namespace.clone(), owner);
            if let Some(set) = self.owner_index.get_mut(&owner) {
                set.remove(&instance.key().to_string());
                if set.is_empty() {
                    self.owner_index.remove(&owner);
                }
            }
        }
    }

    fn bump(&mut self) -> u64 {
        self.version += 1;
        self.version
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
