//! Create path described in the data flow: direct submission while online,
//! capture into the pending queue when the backend is unreachable.

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use uuid::Uuid;

use crate::errors::{BackendError, Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::queue::PendingQueue;
use crate::sync::ConnectivityMonitor;

use super::{NewProduct, Product};

/// Backend product endpoints.
///
/// Submission takes the serialized payload rather than [`NewProduct`] so
/// direct creates and queue replays go through the same call with the same
/// bytes.
#[async_trait]
pub trait ProductsApi: Send + Sync {
    async fn submit_product(
        &self,
        payload: &serde_json::Value,
    ) -> std::result::Result<Product, BackendError>;

    async fn list_products(&self) -> std::result::Result<Vec<Product>, BackendError>;
}

/// What happened to a create request.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// The backend accepted the product immediately.
    Created(Product),
    /// The backend was unreachable; the write waits in the queue.
    Queued { write_id: Uuid },
}

pub struct ProductService {
    api: Arc<dyn ProductsApi>,
    queue: Arc<PendingQueue>,
    monitor: Arc<ConnectivityMonitor>,
    events: Arc<dyn DomainEventSink>,
}

impl ProductService {
    pub fn new(
        api: Arc<dyn ProductsApi>,
        queue: Arc<PendingQueue>,
        monitor: Arc<ConnectivityMonitor>,
        events: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            api,
            queue,
            monitor,
            events,
        }
    }

    /// Create a product, queueing it when the backend cannot be reached.
    ///
    /// Only transport failures fall back to the queue. A rejection (the
    /// backend answered and said no) returns [`Error::WriteSubmission`] so
    /// the form can show it; queueing a payload the backend already refused
    /// would just replay the refusal forever.
    pub async fn create(&self, product: NewProduct) -> Result<CreateOutcome> {
        let payload = serde_json::to_value(&product)?;

        if !self.monitor.is_online() {
            return Ok(self.capture(payload).await);
        }

        match self.api.submit_product(&payload).await {
            Ok(created) => {
                self.events.publish(DomainEvent::ProductCreated {
                    id: created.id.clone(),
                });
                Ok(CreateOutcome::Created(created))
            }
            Err(err) if err.is_network() => {
                warn!(
                    "[Sync] Product submission failed in transit, capturing for replay: {}",
                    err
                );
                Ok(self.capture(payload).await)
            }
            Err(err) => Err(Error::WriteSubmission(err)),
        }
    }

    /// Current product list straight from the backend.
    pub async fn list(&self) -> Result<Vec<Product>> {
        Ok(self.api.list_products().await?)
    }

    async fn capture(&self, payload: serde_json::Value) -> CreateOutcome {
        let write = self.queue.enqueue(payload).await;
        self.events.publish(DomainEvent::WriteQueued {
            id: write.id.to_string(),
        });
        CreateOutcome::Queued { write_id: write.id }
    }
}
