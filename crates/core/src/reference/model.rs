//! Reference record shapes shared between backend, cache, and store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ReferenceKind;

/// One reference record as served by the backend.
///
/// Only `id` and `label` are interpreted locally; any other per-kind columns
/// ride along in `extra` so a cache round-trip loses nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceItem {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ReferenceItem {
    /// Item carrying only id and label; convenient for tests and seeds.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            extra: HashMap::new(),
        }
    }
}

/// All reference lists as of one successful full fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceSnapshot {
    pub lists: HashMap<ReferenceKind, Vec<ReferenceItem>>,
    pub fetched_at: DateTime<Utc>,
}

impl ReferenceSnapshot {
    /// The list for one kind; empty when the kind is missing from the snapshot.
    pub fn items(&self, kind: ReferenceKind) -> &[ReferenceItem] {
        self.lists.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}
