// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process store backed by a shared [`StoreState`].

use super::{Propagation, Store, StoreError};
use async_trait::async_trait;
use parking_lot::Mutex;
use recur_core::{
    Clock, IdGen, InstanceStatus, JobInstance, ObjectKey, Schedule, SystemClock, UuidIdGen,
};
use recur_storage::StoreState;
use std::sync::Arc;

/// Store that keeps every object in memory.
///
/// Clones share state. The daemon persists [`MemoryStore::state`] through
/// snapshots; tests inspect it directly.
#[derive(Clone)]
pub struct MemoryStore<C: Clock = SystemClock, G: IdGen = UuidIdGen> {
    state: Arc<Mutex<StoreState>>,
    clock: C,
    ids: G,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_state(StoreState::default(), SystemClock, UuidIdGen)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock, G: IdGen> MemoryStore<C, G> {
    pub fn with_state(state: StoreState, clock: C, ids: G) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            clock,
            ids,
        }
    }

    /// Shared handle to the underlying state.
    pub fn state(&self) -> Arc<Mutex<StoreState>> {
        Arc::clone(&self.state)
    }

    /// Copy of the current state, e.g. for snapshotting.
    pub fn snapshot_state(&self) -> StoreState {
        self.state.lock().clone()
    }

    /// Create or update a schedule from its declared form.
    pub fn apply_schedule(&self, schedule: Schedule) -> Schedule {
        let uid = self.ids.next();
        let now = self.clock.now();
        self.state.lock().apply_schedule(schedule, uid, now)
    }

    /// Insert a schedule keeping its identity and status.
    ///
    /// Missing uid and creation time are filled in.
    pub fn seed_schedule(&self, mut schedule: Schedule) -> Schedule {
        if schedule.meta.uid.is_empty() {
            schedule.meta.uid = self.ids.next();
        }
        schedule
            .meta
            .creation_timestamp
            .get_or_insert_with(|| self.clock.now());
        self.state.lock().insert_schedule(schedule)
    }

    pub fn remove_schedule(&self, key: &ObjectKey) -> Result<Schedule, StoreError> {
        Ok(self.state.lock().remove_schedule(key)?)
    }

    /// Record execution progress for an instance, as the execution
    /// subsystem would.
    pub fn set_instance_status(
        &self,
        key: &ObjectKey,
        status: InstanceStatus,
    ) -> Result<JobInstance, StoreError> {
        Ok(self.state.lock().update_instance_status(key, status)?)
    }

    /// Insert an instance as-is, bypassing the reconciler.
    pub fn seed_instance(&self, instance: JobInstance) -> Result<JobInstance, StoreError> {
        let uid = if instance.meta.uid.is_empty() {
            self.ids.next()
        } else {
            instance.meta.uid.clone()
        };
        let now = self.clock.now();
        Ok(self.state.lock().create_instance(instance, uid, now)?)
    }

    pub fn schedule_keys(&self) -> Vec<ObjectKey> {
        self.state
            .lock()
            .schedules
            .values()
            .map(|s| s.meta.key())
            .collect()
    }

    pub fn instances_owned_by(&self, owner: &ObjectKey) -> Vec<JobInstance> {
        self.state.lock().instances_owned_by(owner)
    }
}

#[async_trait]
impl<C: Clock, G: IdGen> Store for MemoryStore<C, G> {
    async fn get_schedule(&self, key: &ObjectKey) -> Result<Schedule, StoreError> {
        self.state
            .lock()
            .get_schedule(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.clone()))
    }

    async fn list_owned_instances(
        &self,
        owner: &ObjectKey,
    ) -> Result<Vec<JobInstance>, StoreError> {
        Ok(self.state.lock().instances_owned_by(owner))
    }

    async fn update_schedule_status(&self, schedule: &Schedule) -> Result<Schedule, StoreError> {
        Ok(self.state.lock().update_schedule_status(schedule)?)
    }

    async fn create_instance(&self, instance: &JobInstance) -> Result<JobInstance, StoreError> {
        let uid = self.ids.next();
        let now = self.clock.now();
        Ok(self
            .state
            .lock()
            .create_instance(instance.clone(), uid, now)?)
    }

    async fn delete_instance(
        &self,
        key: &ObjectKey,
        _propagation: Propagation,
    ) -> Result<(), StoreError> {
        // instances own nothing in this store, so every propagation mode is equivalent
        self.state.lock().delete_instance(key)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
