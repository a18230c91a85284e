// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for reconcile passes

use recur_adapters::StoreError;
use recur_core::ObjectKey;
use thiserror::Error;

/// Failures that abort a pass; the caller retries the whole pass later.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconcileError {
    #[error("unable to fetch schedule {key}: {source}")]
    Fetch { key: ObjectKey, source: StoreError },
    #[error("unable to list instances of {key}: {source}")]
    List { key: ObjectKey, source: StoreError },
    #[error("unable to update status of {key}: {source}")]
    UpdateStatus { key: ObjectKey, source: StoreError },
}

impl ReconcileError {
    pub fn store_error(&self) -> &StoreError {
        match self {
            ReconcileError::Fetch { source, .. }
            | ReconcileError::List { source, .. }
            | ReconcileError::UpdateStatus { source, .. } => source,
        }
    }
}
