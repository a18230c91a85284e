// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Namespace-scoped object identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a stored object: namespace plus name.
///
/// An empty namespace is allowed and renders as the bare name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectKey {
    #[serde(default)]
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Parse a `"{namespace}/{name}"` key.
    ///
    /// A key without a slash has an empty namespace.
    pub fn parse(scoped: &str) -> Self {
        match scoped.split_once('/') {
            Some((ns, name)) => Self::new(ns, name),
            None => Self::new("", scoped),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
