use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal_macros::dec;
use serde_json::json;
use tokio::sync::Notify;

use tessera_local_store::{LocalStore, MemoryStore};

use crate::errors::BackendError;
use crate::events::{BroadcastEventSink, DomainEvent, DomainEventSink, NullEventSink};
use crate::products::{CreateOutcome, NewProduct, Product, ProductService, ProductsApi};
use crate::queue::PendingQueue;

use super::{ConnectivityMonitor, FlushOutcome, SyncCoordinator};

enum SubmissionScript {
    Accept,
    Reject(BackendError),
    HoldUntilReleased,
}

/// Backend double: scripted verdict per submission (in call order,
/// defaulting to accept), with captured payloads and a gate to hold one
/// submission open.
#[derive(Default)]
struct ScriptedBackend {
    scripts: Mutex<VecDeque<SubmissionScript>>,
    submissions: Mutex<Vec<serde_json::Value>>,
    accepted: Mutex<Vec<Product>>,
    entered: Notify,
    release: Notify,
}

impl ScriptedBackend {
    fn script(&self, script: SubmissionScript) {
        self.scripts.lock().unwrap().push_back(script);
    }

    fn submitted_names(&self) -> Vec<String> {
        self.submissions
            .lock()
            .unwrap()
            .iter()
            .map(|payload| payload["name"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    fn accept(&self, payload: &serde_json::Value) -> Product {
        let mut accepted = self.accepted.lock().unwrap();
        let product = Product {
            id: format!("prod-{}", accepted.len() + 1),
            name: payload["name"].as_str().unwrap_or("unnamed").to_string(),
            article_code: payload["articleCode"].as_str().unwrap_or("A-1").to_string(),
            supplier_id: "sup-1".to_string(),
            material_id: "mat-1".to_string(),
            pattern_id: "pat-1".to_string(),
            size_id: "siz-1".to_string(),
            surface_id: "sur-1".to_string(),
            color_id: "col-1".to_string(),
            unit_price: dec!(10),
            remark: None,
            created_at: Utc::now(),
        };
        accepted.push(product.clone());
        product
    }
}

#[async_trait]
impl ProductsApi for ScriptedBackend {
    async fn submit_product(
        &self,
        payload: &serde_json::Value,
    ) -> Result<Product, BackendError> {
        self.submissions.lock().unwrap().push(payload.clone());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(SubmissionScript::Accept);
        match script {
            SubmissionScript::Accept => Ok(self.accept(payload)),
            SubmissionScript::Reject(err) => Err(err),
            SubmissionScript::HoldUntilReleased => {
                self.entered.notify_one();
                self.release.notified().await;
                Ok(self.accept(payload))
            }
        }
    }

    async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        Ok(self.accepted.lock().unwrap().clone())
    }
}

async fn harness(
    backend: Arc<ScriptedBackend>,
    online: bool,
) -> (Arc<SyncCoordinator>, Arc<PendingQueue>, Arc<ConnectivityMonitor>) {
    harness_with_events(backend, online, Arc::new(NullEventSink)).await
}

async fn harness_with_events(
    backend: Arc<ScriptedBackend>,
    online: bool,
    events: Arc<dyn DomainEventSink>,
) -> (Arc<SyncCoordinator>, Arc<PendingQueue>, Arc<ConnectivityMonitor>) {
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
    let queue = Arc::new(PendingQueue::open(store).await);
    let monitor = Arc::new(ConnectivityMonitor::new(online));
    let coordinator = Arc::new(SyncCoordinator::new(
        backend,
        Arc::clone(&queue),
        Arc::clone(&monitor),
        events,
    ));
    (coordinator, queue, monitor)
}

fn tile_x() -> NewProduct {
    NewProduct {
        name: "Tile-X".to_string(),
        article_code: "TX-600".to_string(),
        supplier_id: "sup-1".to_string(),
        material_id: "mat-1".to_string(),
        pattern_id: "pat-1".to_string(),
        size_id: "siz-1".to_string(),
        surface_id: "sur-1".to_string(),
        color_id: "col-1".to_string(),
        unit_price: dec!(42.5),
        remark: None,
    }
}

#[tokio::test]
async fn a_second_trigger_during_a_flush_is_a_no_op() {
    let backend = Arc::new(ScriptedBackend::default());
    backend.script(SubmissionScript::HoldUntilReleased);
    let (coordinator, queue, _monitor) = harness(Arc::clone(&backend), true).await;
    queue.enqueue(json!({"name": "A"})).await;

    let background = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move { coordinator.flush().await })
    };
    backend.entered.notified().await;

    let report = coordinator.flush().await;
    assert_eq!(report.outcome, FlushOutcome::AlreadyRunning);
    assert_eq!(report.submitted, 0);
    assert!(coordinator.status().await.flush_in_flight);

    backend.release.notify_one();
    let report = background.await.expect("flush task");
    assert_eq!(report.outcome, FlushOutcome::Completed);
    assert_eq!(report.submitted, 1);
    assert!(queue.is_empty().await);
    assert!(!coordinator.status().await.flush_in_flight);
}

#[tokio::test]
async fn replays_strictly_oldest_first() {
    let backend = Arc::new(ScriptedBackend::default());
    let (coordinator, queue, _monitor) = harness(Arc::clone(&backend), true).await;
    for name in ["A", "B", "C"] {
        queue.enqueue(json!({ "name": name })).await;
    }

    let report = coordinator.flush().await;

    assert_eq!(report.outcome, FlushOutcome::Completed);
    assert_eq!(report.submitted, 3);
    assert_eq!(backend.submitted_names(), vec!["A", "B", "C"]);
    assert!(queue.is_empty().await);
}

#[tokio::test]
async fn a_rejected_entry_stays_queued_while_others_drain() {
    let backend = Arc::new(ScriptedBackend::default());
    backend.script(SubmissionScript::Accept);
    backend.script(SubmissionScript::Reject(BackendError::rejected(500, "boom")));
    backend.script(SubmissionScript::Accept);
    let (coordinator, queue, _monitor) = harness(Arc::clone(&backend), true).await;
    for name in ["A", "B", "C"] {
        queue.enqueue(json!({ "name": name })).await;
    }

    let report = coordinator.flush().await;
    assert_eq!(report.submitted, 2);
    assert_eq!(report.failed, 1);

    let remaining: Vec<_> = queue
        .list()
        .await
        .into_iter()
        .map(|entry| entry.payload["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(remaining, vec!["B"]);

    let status = coordinator.status().await;
    assert!(status.last_error.as_deref().unwrap_or_default().contains("boom"));

    // Unscripted submissions accept, so the kept entry drains next pass.
    let report = coordinator.flush().await;
    assert_eq!(report.submitted, 1);
    assert!(queue.is_empty().await);
    assert!(coordinator.status().await.last_error.is_none());
}

#[tokio::test]
async fn offline_flush_leaves_the_queue_untouched() {
    let backend = Arc::new(ScriptedBackend::default());
    let (coordinator, queue, _monitor) = harness(Arc::clone(&backend), false).await;
    queue.enqueue(json!({"name": "A"})).await;

    let report = coordinator.flush().await;

    assert_eq!(report.outcome, FlushOutcome::Offline);
    assert_eq!(queue.len().await, 1);
    assert!(backend.submitted_names().is_empty());
    assert!(coordinator.status().await.last_flush_at.is_none());
}

#[tokio::test]
async fn the_gate_releases_after_a_failing_pass() {
    let backend = Arc::new(ScriptedBackend::default());
    backend.script(SubmissionScript::Reject(BackendError::network(
        "connection reset",
    )));
    let (coordinator, queue, _monitor) = harness(Arc::clone(&backend), true).await;
    queue.enqueue(json!({"name": "A"})).await;

    let report = coordinator.flush().await;
    assert_eq!(report.failed, 1);
    assert!(!coordinator.status().await.flush_in_flight);

    let report = coordinator.flush().await;
    assert_eq!(report.outcome, FlushOutcome::Completed);
    assert_eq!(report.submitted, 1);
    assert!(queue.is_empty().await);
}

#[tokio::test]
async fn an_empty_pass_still_records_the_flush_time() {
    let backend = Arc::new(ScriptedBackend::default());
    let (coordinator, _queue, _monitor) = harness(backend, true).await;

    let report = coordinator.flush().await;

    assert_eq!(report.outcome, FlushOutcome::Completed);
    assert_eq!(report.submitted, 0);
    assert!(coordinator.status().await.last_flush_at.is_some());
}

#[tokio::test]
async fn flush_publishes_replay_and_completion_events() {
    let backend = Arc::new(ScriptedBackend::default());
    let events = Arc::new(BroadcastEventSink::default());
    let mut rx = events.subscribe();
    let (coordinator, queue, _monitor) =
        harness_with_events(backend, true, Arc::clone(&events) as Arc<dyn DomainEventSink>).await;

    let write = queue.enqueue(json!({"name": "A"})).await;
    coordinator.flush().await;

    assert_eq!(
        rx.recv().await.expect("event"),
        DomainEvent::WriteReplayed {
            id: write.id.to_string()
        }
    );
    assert_eq!(
        rx.recv().await.expect("event"),
        DomainEvent::FlushCompleted {
            submitted: 1,
            failed: 0
        }
    );
}

#[tokio::test]
async fn watcher_flushes_when_connectivity_returns() {
    let backend = Arc::new(ScriptedBackend::default());
    let (coordinator, queue, monitor) = harness(Arc::clone(&backend), true).await;

    coordinator.start();
    for _ in 0..100 {
        if coordinator.status().await.last_flush_at.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(
        coordinator.status().await.last_flush_at.is_some(),
        "initial flush did not run"
    );

    monitor.set_online(false);
    queue.enqueue(json!({"name": "A"})).await;
    monitor.set_online(true);

    for _ in 0..100 {
        if queue.is_empty().await {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(queue.is_empty().await, "watcher did not replay the queue");
    assert_eq!(backend.submitted_names(), vec!["A"]);
    coordinator.stop();
}

#[tokio::test]
async fn a_write_captured_offline_reaches_the_product_list_after_reconnect() {
    let backend = Arc::new(ScriptedBackend::default());
    let (coordinator, queue, monitor) = harness(Arc::clone(&backend), false).await;
    let service = ProductService::new(
        Arc::clone(&backend) as Arc<dyn ProductsApi>,
        Arc::clone(&queue),
        Arc::clone(&monitor),
        Arc::new(NullEventSink),
    );

    let outcome = service.create(tile_x()).await.expect("create");
    assert!(matches!(outcome, CreateOutcome::Queued { .. }));
    assert!(backend.submitted_names().is_empty());

    monitor.set_online(true);
    let report = coordinator.flush().await;
    assert_eq!(report.submitted, 1);
    assert!(queue.is_empty().await);

    let products = service.list().await.expect("list");
    let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Tile-X"]);
}
