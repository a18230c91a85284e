// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::store::{Propagation, Store, StoreError};
use async_trait::async_trait;
use recur_core::{JobInstance, ObjectKey, Schedule};
use tracing::Instrument;

/// Wrapper that adds tracing to any Store
#[derive(Clone)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: Store> Store for TracedStore<S> {
    async fn get_schedule(&self, key: &ObjectKey) -> Result<Schedule, StoreError> {
        let result = self.inner.get_schedule(key).await;
        tracing::debug_span!("store.get", key = %key).in_scope(|| match &result {
            Ok(s) => tracing::debug!(resource_version = s.meta.resource_version, "fetched"),
            Err(e) if e.is_not_found() => tracing::debug!("not found"),
            Err(e) => tracing::error!(error = %e, "get failed"),
        });
        result
    }

    async fn list_owned_instances(
        &self,
        owner: &ObjectKey,
    ) -> Result<Vec<JobInstance>, StoreError> {
        async {
            let start = std::time::Instant::now();
            let result = self.inner.list_owned_instances(owner).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(list) => tracing::debug!(count = list.len(), elapsed_ms, "listed"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "list failed"),
            }
            result
        }
        .instrument(tracing::debug_span!("store.list", owner = %owner))
        .await
    }

    async fn update_schedule_status(&self, schedule: &Schedule) -> Result<Schedule, StoreError> {
        async {
            let result = self.inner.update_schedule_status(schedule).await;
            match &result {
                Ok(s) => tracing::debug!(
                    active = s.status.active.len(),
                    resource_version = s.meta.resource_version,
                    "status written"
                ),
                Err(e) => tracing::warn!(error = %e, "status update failed"),
            }
            result
        }
        .instrument(tracing::info_span!("store.update_status", key = %schedule.meta.key()))
        .await
    }

    async fn create_instance(&self, instance: &JobInstance) -> Result<JobInstance, StoreError> {
        async {
            let start = std::time::Instant::now();
            let result = self.inner.create_instance(instance).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(created) => {
                    tracing::info!(uid = created.meta.uid.as_str(), elapsed_ms, "instance created")
                }
                Err(e) if e.is_already_exists() => tracing::info!(elapsed_ms, "already exists"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "create failed"),
            }
            result
        }
        .instrument(tracing::info_span!("store.create", key = %instance.key()))
        .await
    }

    async fn delete_instance(
        &self,
        key: &ObjectKey,
        propagation: Propagation,
    ) -> Result<(), StoreError> {
        let result = self.inner.delete_instance(key, propagation).await;
        tracing::info_span!("store.delete", key = %key, ?propagation).in_scope(|| match &result {
            Ok(()) => tracing::info!("instance deleted"),
            Err(e) if e.is_not_found() => tracing::debug!("already gone"),
            Err(e) => tracing::error!(error = %e, "delete failed"),
        });
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
