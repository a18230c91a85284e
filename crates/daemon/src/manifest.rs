// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative schedule manifest (TOML).
//!
//! ```toml
//! [schedule.backup]
//! schedule = "0 * * * *"
//! concurrency_policy = "forbid"
//!
//! [schedule.backup.template]
//! labels = { app = "backup" }
//! payload = { image = "backup:latest" }
//! ```

use recur_core::{
    ConcurrencyPolicy, InstanceTemplate, ObjectKey, ObjectMeta, Schedule, ScheduleSpec,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_NAMESPACE: &str = "default";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid schedule name {0:?}")]
    InvalidName(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub schedule: BTreeMap<String, ScheduleEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleEntry {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    pub schedule: String,
    #[serde(default)]
    pub concurrency_policy: ConcurrencyPolicy,
    #[serde(default)]
    pub suspend: Option<bool>,
    #[serde(default)]
    pub starting_deadline_seconds: Option<u64>,
    #[serde(default)]
    pub successful_jobs_history_limit: Option<u32>,
    #[serde(default)]
    pub failed_jobs_history_limit: Option<u32>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub template: TemplateEntry,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateEntry {
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    /// Opaque work description copied onto each instance.
    #[serde(default)]
    pub payload: serde_json::Value,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_owned(),
            source,
        })?;
        let manifest = Self::parse(&content).map_err(|source| ManifestError::Parse {
            path: path.to_owned(),
            source,
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn validate(&self) -> Result<(), ManifestError> {
        for (name, entry) in &self.schedule {
            if name.is_empty() || name.contains('/') || entry.namespace.contains('/') {
                return Err(ManifestError::InvalidName(name.clone()));
            }
        }
        Ok(())
    }

    /// Keys of every declared schedule.
    pub fn keys(&self) -> Vec<ObjectKey> {
        self.schedule
            .iter()
            .map(|(name, entry)| ObjectKey::new(entry.namespace.clone(), name.clone()))
            .collect()
    }

    /// Declared schedules, without identity or status.
    pub fn schedules(&self) -> Vec<Schedule> {
        self.schedule
            .iter()
            .map(|(name, entry)| entry.to_schedule(name))
            .collect()
    }
}

impl ScheduleEntry {
    pub fn to_schedule(&self, name: &str) -> Schedule {
        let mut meta = ObjectMeta::new(self.namespace.clone(), name);
        meta.labels = self.labels.clone();
        Schedule::new(
            meta,
            ScheduleSpec {
                schedule: self.schedule.clone(),
                job_template: InstanceTemplate {
                    labels: self.template.labels.clone(),
                    annotations: self.template.annotations.clone(),
                    spec: self.template.payload.clone(),
                },
                concurrency_policy: self.concurrency_policy,
                suspend: self.suspend,
                starting_deadline_seconds: self.starting_deadline_seconds,
                successful_jobs_history_limit: self.successful_jobs_history_limit,
                failed_jobs_history_limit: self.failed_jobs_history_limit,
            },
        )
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
