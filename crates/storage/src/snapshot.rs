// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot persistence for crash recovery.
//!
//! The daemon writes the whole [`StoreState`] on a fixed checkpoint interval
//! and at shutdown, and reloads it on startup. A missing or corrupt snapshot starts from empty
//! state; the reconciler re-derives everything else from the manifest.

use crate::StoreState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur in snapshot operations
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The store contents at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: StoreState,
    pub created_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(state: StoreState, created_at: DateTime<Utc>) -> Self {
        Self { state, created_at }
    }

    /// Save snapshot atomically (write to .tmp, then rename).
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, self)?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;

        Ok(())
    }

    /// Load snapshot if it exists, with the owner index rebuilt.
    ///
    /// Returns `Ok(None)` if the file doesn't exist or is corrupt.
    /// Corrupt snapshots are moved aside to a `.bak` file.
    pub fn load(path: &Path) -> Result<Option<Self>, SnapshotError> {
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, Snapshot>(reader) {
            Ok(mut snapshot) => {
                snapshot.state.rebuild_index();
                Ok(Some(snapshot))
            }
            Err(e) => {
                let bak_path = rotate_bak_path(path);
                warn!(
                    error = %e,
                    path = %path.display(),
                    bak = %bak_path.display(),
                    "corrupt snapshot, moving to .bak and starting fresh",
                );
                fs::rename(path, &bak_path)?;
                Ok(None)
            }
        }
    }
}

const MAX_BAK_FILES: u32 = 3;

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
