// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object store adapters

mod memory;

pub use memory::MemoryStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FailPoint, FakeStore, StoreCall};

use async_trait::async_trait;
use recur_core::{JobInstance, ObjectKey, Schedule};
use recur_storage::StateError;
use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(ObjectKey),
    #[error("{0} already exists")]
    AlreadyExists(ObjectKey),
    #[error("conflict writing {key}: {message}")]
    Conflict { key: ObjectKey, message: String },
    #[error("store unavailable: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists(_))
    }
}

impl From<StateError> for StoreError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::NotFound { key, .. } => StoreError::NotFound(key),
            StateError::AlreadyExists { key, .. } => StoreError::AlreadyExists(key),
            StateError::Conflict {
                key,
                expected,
                actual,
                ..
            } => StoreError::Conflict {
                key,
                message: format!("expected version {expected}, found {actual}"),
            },
        }
    }
}

/// What happens to objects owned by a deleted object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Delete the object now; dependents are collected afterwards.
    Background,
    /// Delete dependents first, then the object.
    Foreground,
    /// Leave dependents in place without an owner.
    Orphan,
}

/// Declarative object store holding schedules and the instances they launch.
///
/// Every call is a single round trip; implementations never retry.
#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    /// Fetch a schedule by key.
    async fn get_schedule(&self, key: &ObjectKey) -> Result<Schedule, StoreError>;

    /// List instances whose controller owner is the schedule at `owner`.
    async fn list_owned_instances(&self, owner: &ObjectKey)
        -> Result<Vec<JobInstance>, StoreError>;

    /// Write the status sub-object of a schedule, leaving its spec alone.
    ///
    /// Fails with [`StoreError::Conflict`] if the schedule changed since it
    /// was read.
    async fn update_schedule_status(&self, schedule: &Schedule) -> Result<Schedule, StoreError>;

    /// Create an instance; fails with [`StoreError::AlreadyExists`] if the
    /// name is taken.
    async fn create_instance(&self, instance: &JobInstance) -> Result<JobInstance, StoreError>;

    /// Delete an instance.
    async fn delete_instance(
        &self,
        key: &ObjectKey,
        propagation: Propagation,
    ) -> Result<(), StoreError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
