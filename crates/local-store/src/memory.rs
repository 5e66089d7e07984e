//! In-memory store used by tests and ephemeral embeddings.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{LocalStore, Result};

/// HashMap-backed store with no durability; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.entries.lock().unwrap().insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
