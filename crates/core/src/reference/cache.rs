//! In-memory reference snapshot with a persisted fallback.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use futures::future::try_join_all;
use log::{debug, warn};

use tessera_local_store::{load_json, save_json, LocalStore};

use crate::errors::{BackendError, Error, Result};
use crate::events::{DomainEvent, DomainEventSink};

use super::{ReferenceItem, ReferenceKind, ReferenceSnapshot};

/// Store key holding the serialized reference snapshot.
pub const REFERENCE_SNAPSHOT_KEY: &str = "reference_snapshot";

/// Backend list endpoints, one per reference kind.
#[async_trait]
pub trait ReferencesApi: Send + Sync {
    /// Fetch the current list for one kind.
    async fn list_reference(
        &self,
        kind: ReferenceKind,
    ) -> std::result::Result<Vec<ReferenceItem>, BackendError>;
}

#[derive(Debug, Default)]
struct CacheState {
    snapshot: Option<ReferenceSnapshot>,
    by_id: HashMap<ReferenceKind, HashMap<String, ReferenceItem>>,
}

/// Serves reference lists to the view layer: fresh from the backend when a
/// load succeeds, from the persisted snapshot otherwise.
///
/// One generic store covers every kind; per-kind behavior is data
/// ([`ReferenceKind::ALL`]), not code.
pub struct ReferenceCache {
    api: Arc<dyn ReferencesApi>,
    store: Arc<dyn LocalStore>,
    events: Arc<dyn DomainEventSink>,
    state: RwLock<CacheState>,
}

impl ReferenceCache {
    pub fn new(
        api: Arc<dyn ReferencesApi>,
        store: Arc<dyn LocalStore>,
        events: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            api,
            store,
            events,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Fetch every kind and replace the snapshot.
    ///
    /// The fetch is one coherent pass: if any kind fails, the whole load
    /// fails with [`Error::MetadataFetch`] and memory stays unchanged, so
    /// callers keep serving the previous (or persisted) snapshot.
    pub async fn load(&self) -> Result<ReferenceSnapshot> {
        let fetches = ReferenceKind::ALL.iter().map(|kind| {
            let kind = *kind;
            async move {
                match self.api.list_reference(kind).await {
                    Ok(items) => Ok((kind, items)),
                    Err(source) => Err(Error::MetadataFetch { kind, source }),
                }
            }
        });
        let lists = try_join_all(fetches).await?;

        let snapshot = ReferenceSnapshot {
            lists: lists.into_iter().collect(),
            fetched_at: Utc::now(),
        };

        if let Err(err) = save_json(self.store.as_ref(), REFERENCE_SNAPSHOT_KEY, &snapshot).await {
            warn!("Failed to persist reference snapshot: {}", err);
        }

        self.replace_in_memory(snapshot.clone());
        self.events.publish(DomainEvent::ReferenceSnapshotReplaced {
            kinds: snapshot.lists.len(),
        });
        Ok(snapshot)
    }

    /// Persisted snapshot from the local store, without network access.
    pub async fn cached(&self) -> Option<ReferenceSnapshot> {
        load_json(self.store.as_ref(), REFERENCE_SNAPSHOT_KEY).await
    }

    /// Adopt the persisted snapshot into memory if one exists.
    ///
    /// Called once at startup so forms have choices before the first network
    /// load finishes, and while offline.
    pub async fn hydrate_from_store(&self) -> bool {
        match self.cached().await {
            Some(snapshot) => {
                debug!(
                    "Hydrated reference snapshot from local store ({} kinds)",
                    snapshot.lists.len()
                );
                self.replace_in_memory(snapshot);
                true
            }
            None => false,
        }
    }

    /// Replace one kind's list in memory and rebuild its id index.
    ///
    /// Used after kind-specific CRUD so the UI stays consistent without a
    /// full reload. Does not persist by itself.
    pub fn set_kind(&self, kind: ReferenceKind, items: Vec<ReferenceItem>) {
        let count = items.len();
        {
            let mut state = self.state.write().unwrap();
            let index = items
                .iter()
                .map(|item| (item.id.clone(), item.clone()))
                .collect();
            match state.snapshot.as_mut() {
                Some(snapshot) => {
                    snapshot.lists.insert(kind, items);
                }
                None => {
                    let mut lists = HashMap::new();
                    lists.insert(kind, items);
                    state.snapshot = Some(ReferenceSnapshot {
                        lists,
                        fetched_at: Utc::now(),
                    });
                }
            }
            state.by_id.insert(kind, index);
        }
        self.events
            .publish(DomainEvent::ReferenceKindUpdated { kind, items: count });
    }

    /// Current in-memory snapshot, if any load or hydrate has happened.
    pub fn snapshot(&self) -> Option<ReferenceSnapshot> {
        self.state.read().unwrap().snapshot.clone()
    }

    /// Current in-memory list for one kind; empty when nothing is loaded.
    pub fn items(&self, kind: ReferenceKind) -> Vec<ReferenceItem> {
        self.state
            .read()
            .unwrap()
            .snapshot
            .as_ref()
            .map(|snapshot| snapshot.items(kind).to_vec())
            .unwrap_or_default()
    }

    /// Look up one record by id within a kind.
    pub fn lookup(&self, kind: ReferenceKind, id: &str) -> Option<ReferenceItem> {
        self.state
            .read()
            .unwrap()
            .by_id
            .get(&kind)
            .and_then(|index| index.get(id))
            .cloned()
    }

    fn replace_in_memory(&self, snapshot: ReferenceSnapshot) {
        let by_id = snapshot
            .lists
            .iter()
            .map(|(kind, items)| {
                let index = items
                    .iter()
                    .map(|item| (item.id.clone(), item.clone()))
                    .collect::<HashMap<_, _>>();
                (*kind, index)
            })
            .collect();
        let mut state = self.state.write().unwrap();
        state.by_id = by_id;
        state.snapshot = Some(snapshot);
    }
}
