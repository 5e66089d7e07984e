//! Application assembly: one container constructing and wiring the store,
//! API client, cache, queue, monitor, coordinator, and product service.

use std::sync::Arc;

use log::info;

use tessera_core::events::{BroadcastEventSink, DomainEventSink};
use tessera_core::products::{ProductService, ProductsApi};
use tessera_core::queue::PendingQueue;
use tessera_core::reference::{ReferenceCache, ReferencesApi};
use tessera_core::sync::{ConnectivityMonitor, SyncCoordinator};
use tessera_local_store::{FileStore, LocalStore};

use crate::client::CatalogApiClient;
use crate::config::ClientConfig;

/// Service container the view layer holds; everything else is reached
/// through the accessors. Tests build isolated instances per case.
pub struct AppContext {
    pub local_store: Arc<dyn LocalStore>,
    pub api_client: Arc<CatalogApiClient>,
    pub event_sink: Arc<BroadcastEventSink>,
    pub reference_cache: Arc<ReferenceCache>,
    pub pending_queue: Arc<PendingQueue>,
    pub connectivity_monitor: Arc<ConnectivityMonitor>,
    pub sync_coordinator: Arc<SyncCoordinator>,
    pub product_service: Arc<ProductService>,
}

impl AppContext {
    /// Build the full service graph over a file-backed store.
    pub async fn new(config: &ClientConfig) -> tessera_core::Result<Self> {
        let store: Arc<dyn LocalStore> = Arc::new(FileStore::open(&config.data_dir)?);
        let api = Arc::new(CatalogApiClient::new(&config.api_url));
        Ok(Self::assemble(store, api).await)
    }

    /// Build over a caller-supplied store, for tests and embeddings.
    pub async fn with_store(store: Arc<dyn LocalStore>, api_url: &str) -> Self {
        Self::assemble(store, Arc::new(CatalogApiClient::new(api_url))).await
    }

    async fn assemble(store: Arc<dyn LocalStore>, api: Arc<CatalogApiClient>) -> Self {
        let events = Arc::new(BroadcastEventSink::default());
        let cache = Arc::new(ReferenceCache::new(
            Arc::clone(&api) as Arc<dyn ReferencesApi>,
            Arc::clone(&store),
            Arc::clone(&events) as Arc<dyn DomainEventSink>,
        ));
        let queue = Arc::new(PendingQueue::open(Arc::clone(&store)).await);
        // Assume reachable until a signal says otherwise; the create path
        // falls back to the queue on transport failure either way.
        let monitor = Arc::new(ConnectivityMonitor::new(true));
        let coordinator = Arc::new(SyncCoordinator::new(
            Arc::clone(&api) as Arc<dyn ProductsApi>,
            Arc::clone(&queue),
            Arc::clone(&monitor),
            Arc::clone(&events) as Arc<dyn DomainEventSink>,
        ));
        let products = Arc::new(ProductService::new(
            Arc::clone(&api) as Arc<dyn ProductsApi>,
            Arc::clone(&queue),
            Arc::clone(&monitor),
            Arc::clone(&events) as Arc<dyn DomainEventSink>,
        ));

        Self {
            local_store: store,
            api_client: api,
            event_sink: events,
            reference_cache: cache,
            pending_queue: queue,
            connectivity_monitor: monitor,
            sync_coordinator: coordinator,
            product_service: products,
        }
    }

    /// Prepare for use: adopt the persisted reference snapshot so forms
    /// have choices before the first load, then start the connectivity
    /// watcher (which makes the initial flush attempt).
    pub async fn init(&self) {
        if self.reference_cache.hydrate_from_store().await {
            info!("Serving persisted reference snapshot until the next load");
        }
        self.sync_coordinator.start();
    }

    /// Stop the background watcher.
    pub fn shutdown(&self) {
        self.sync_coordinator.stop();
    }

    pub fn local_store(&self) -> Arc<dyn LocalStore> {
        Arc::clone(&self.local_store)
    }

    pub fn api_client(&self) -> Arc<CatalogApiClient> {
        Arc::clone(&self.api_client)
    }

    pub fn event_sink(&self) -> Arc<BroadcastEventSink> {
        Arc::clone(&self.event_sink)
    }

    pub fn reference_cache(&self) -> Arc<ReferenceCache> {
        Arc::clone(&self.reference_cache)
    }

    pub fn pending_queue(&self) -> Arc<PendingQueue> {
        Arc::clone(&self.pending_queue)
    }

    pub fn connectivity_monitor(&self) -> Arc<ConnectivityMonitor> {
        Arc::clone(&self.connectivity_monitor)
    }

    pub fn sync_coordinator(&self) -> Arc<SyncCoordinator> {
        Arc::clone(&self.sync_coordinator)
    }

    pub fn product_service(&self) -> Arc<ProductService> {
        Arc::clone(&self.product_service)
    }
}
