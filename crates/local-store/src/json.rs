//! Typed JSON layer over the raw byte store with fail-open reads.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{LocalStore, Result};

/// Serialize `value` as JSON and store it under `key`.
pub async fn save_json<T: Serialize>(store: &dyn LocalStore, key: &str, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value)?;
    store.put(key, bytes).await
}

/// Load and decode the JSON document stored under `key`.
///
/// Unreadable or corrupt documents are treated as absent: the failure is
/// logged and `None` returned, so callers fall open to their default state.
pub async fn load_json<T: DeserializeOwned>(store: &dyn LocalStore, key: &str) -> Option<T> {
    match store.get(key).await {
        Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("Discarding corrupt document under '{}': {}", key, err);
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            log::warn!("Failed to read '{}' from local store: {}", key, err);
            None
        }
    }
}
