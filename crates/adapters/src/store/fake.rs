// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{MemoryStore, Propagation, Store, StoreError};
use async_trait::async_trait;
use parking_lot::Mutex;
use recur_core::{FakeClock, InstanceStatus, JobInstance, ObjectKey, Schedule, SequentialIdGen};
use std::sync::Arc;

/// Recorded store call
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    GetSchedule {
        key: ObjectKey,
    },
    ListOwnedInstances {
        owner: ObjectKey,
    },
    UpdateScheduleStatus {
        schedule: Schedule,
    },
    CreateInstance {
        instance: JobInstance,
    },
    DeleteInstance {
        key: ObjectKey,
        propagation: Propagation,
    },
}

/// Operation that should fail until cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailPoint {
    GetSchedule,
    ListOwnedInstances,
    UpdateScheduleStatus,
    CreateInstance,
    /// Deleting the instance with this name.
    DeleteInstance(String),
}

struct FakeStoreState {
    calls: Vec<StoreCall>,
    failures: Vec<(FailPoint, StoreError)>,
}

/// Fake store for testing: an in-memory store that records every call and
/// can be told to fail specific operations.
#[derive(Clone)]
pub struct FakeStore {
    store: MemoryStore<FakeClock, SequentialIdGen>,
    inner: Arc<Mutex<FakeStoreState>>,
}

impl FakeStore {
    pub fn new(clock: FakeClock) -> Self {
        Self {
            store: MemoryStore::with_state(
                Default::default(),
                clock,
                SequentialIdGen::new("uid"),
            ),
            inner: Arc::new(Mutex::new(FakeStoreState {
                calls: Vec::new(),
                failures: Vec::new(),
            })),
        }
    }

    /// Seed a schedule as built, keeping its uid, creation time and status.
    pub fn add_schedule(&self, schedule: Schedule) -> Schedule {
        self.store.seed_schedule(schedule)
    }

    /// Seed an instance, keeping its uid.
    pub fn add_instance(&self, instance: JobInstance) -> JobInstance {
        match self.store.seed_instance(instance.clone()) {
            Ok(stored) => stored,
            Err(_) => instance,
        }
    }

    pub fn set_instance_status(&self, key: &ObjectKey, status: InstanceStatus) {
        let _ = self.store.set_instance_status(key, status);
    }

    pub fn schedule(&self, key: &ObjectKey) -> Option<Schedule> {
        self.store.state().lock().get_schedule(key).cloned()
    }

    pub fn instances(&self, owner: &ObjectKey) -> Vec<JobInstance> {
        self.store.instances_owned_by(owner)
    }

    /// Make `point` fail with `err` until [`FakeStore::clear_failures`].
    pub fn fail(&self, point: FailPoint, err: StoreError) {
        self.inner.lock().failures.push((point, err));
    }

    pub fn clear_failures(&self) {
        self.inner.lock().failures.clear();
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.inner.lock().calls.clone()
    }

    /// Instances created through the [`Store`] interface, in call order.
    pub fn created(&self) -> Vec<JobInstance> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::CreateInstance { instance } => Some(instance),
                _ => None,
            })
            .collect()
    }

    /// Names of instances deleted through the [`Store`] interface, in call order.
    pub fn deleted(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::DeleteInstance { key, .. } => Some(key.name),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: StoreCall) {
        self.inner.lock().calls.push(call);
    }

    fn check(&self, point: &FailPoint) -> Result<(), StoreError> {
        let inner = self.inner.lock();
        match inner.failures.iter().find(|(p, _)| p == point) {
            Some((_, err)) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Store for FakeStore {
    async fn get_schedule(&self, key: &ObjectKey) -> Result<Schedule, StoreError> {
        self.record(StoreCall::GetSchedule { key: key.clone() });
        self.check(&FailPoint::GetSchedule)?;
        self.store.get_schedule(key).await
    }

    async fn list_owned_instances(
        &self,
        owner: &ObjectKey,
    ) -> Result<Vec<JobInstance>, StoreError> {
        self.record(StoreCall::ListOwnedInstances {
            owner: owner.clone(),
        });
        self.check(&FailPoint::ListOwnedInstances)?;
        self.store.list_owned_instances(owner).await
    }

    async fn update_schedule_status(&self, schedule: &Schedule) -> Result<Schedule, StoreError> {
        self.record(StoreCall::UpdateScheduleStatus {
            schedule: schedule.clone(),
        });
        self.check(&FailPoint::UpdateScheduleStatus)?;
        self.store.update_schedule_status(schedule).await
    }

    async fn create_instance(&self, instance: &JobInstance) -> Result<JobInstance, StoreError> {
        self.record(StoreCall::CreateInstance {
            instance: instance.clone(),
        });
        self.check(&FailPoint::CreateInstance)?;
        self.store.create_instance(instance).await
    }

    async fn delete_instance(
        &self,
        key: &ObjectKey,
        propagation: Propagation,
    ) -> Result<(), StoreError> {
        self.record(StoreCall::DeleteInstance {
            key: key.clone(),
            propagation,
        });
        self.check(&FailPoint::DeleteInstance(key.name.clone()))?;
        self.store.delete_instance(key, propagation).await
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
