//! Durable outbox for writes captured while the backend is unreachable.

use std::sync::Arc;

use chrono::Utc;
use log::warn;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use tessera_local_store::{load_json, save_json, LocalStore};

/// Store key holding the serialized queue.
pub const PENDING_WRITES_KEY: &str = "pending_writes";

/// One deferred write, payload kept exactly as it would have been submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingWrite {
    pub id: Uuid,
    pub payload: serde_json::Value,
    /// Capture time, epoch milliseconds.
    pub enqueued_at: i64,
}

/// FIFO queue of pending writes, persisted after every mutation.
///
/// The in-memory list is authoritative; the store copy exists so entries
/// survive restarts. A persist failure keeps the entry in memory and is
/// retried implicitly on the next mutation.
pub struct PendingQueue {
    store: Arc<dyn LocalStore>,
    entries: Mutex<Vec<PendingWrite>>,
}

impl PendingQueue {
    /// Open the queue, adopting whatever the store already holds.
    /// A corrupt or missing document starts the queue empty.
    pub async fn open(store: Arc<dyn LocalStore>) -> Self {
        let entries: Vec<PendingWrite> = load_json(store.as_ref(), PENDING_WRITES_KEY)
            .await
            .unwrap_or_default();
        Self {
            store,
            entries: Mutex::new(entries),
        }
    }

    /// Append a write and persist the queue.
    pub async fn enqueue(&self, payload: serde_json::Value) -> PendingWrite {
        let write = PendingWrite {
            id: Uuid::now_v7(),
            payload,
            enqueued_at: Utc::now().timestamp_millis(),
        };
        let mut entries = self.entries.lock().await;
        entries.push(write.clone());
        self.persist(&entries).await;
        write
    }

    /// Snapshot of the queue, oldest first.
    pub async fn list(&self) -> Vec<PendingWrite> {
        self.entries.lock().await.clone()
    }

    /// Remove one entry by id. Returns false when the id is unknown,
    /// which callers treat as already done.
    pub async fn remove(&self, id: Uuid) -> bool {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        let removed = entries.len() != before;
        if removed {
            self.persist(&entries).await;
        }
        removed
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        let mut entries = self.entries.lock().await;
        entries.clear();
        self.persist(&entries).await;
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    async fn persist(&self, entries: &[PendingWrite]) {
        if let Err(err) = save_json(self.store.as_ref(), PENDING_WRITES_KEY, &entries).await {
            warn!(
                "[Sync] Failed to persist pending writes ({} queued): {}",
                entries.len(),
                err
            );
        }
    }
}
