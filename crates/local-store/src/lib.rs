//! Durable client-side key/value storage for the catalog app.
//!
//! Two implementations back the same object-safe trait: [`FileStore`] keeps
//! one JSON document per key under a data directory, [`MemoryStore`] keeps
//! everything in process for tests and ephemeral embeddings. The typed layer
//! ([`load_json`]/[`save_json`]) applies the fail-open read policy: corrupt
//! documents are treated as absent, never as fatal.

mod file;
mod json;
mod memory;

pub use file::FileStore;
pub use json::{load_json, save_json};
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by the persistent local store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized for storage.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key contains characters the store cannot map to a file name.
    #[error("invalid store key: {0}")]
    InvalidKey(String),
}

/// Durable key/value storage scoped to the client device.
///
/// Writes overwrite any prior value. Read-after-write within one process
/// returns the just-written value. Eviction by the host environment is out of
/// the store's hands, so callers treat persistence as best-effort; two
/// processes sharing one data directory can clobber each other's keys.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Store raw bytes under `key`, replacing any previous value.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Load the bytes stored under `key`, or `None` if never written.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Delete the value under `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
