use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::events::{DomainEvent, DomainEventSink};
use crate::products::ProductsApi;
use crate::queue::PendingQueue;

use super::ConnectivityMonitor;

/// Why a flush call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushOutcome {
    /// A pass ran over the queue snapshot (possibly empty).
    Completed,
    /// The monitor reported offline; nothing was attempted.
    Offline,
    /// Another flush was already in flight.
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlushReport {
    pub outcome: FlushOutcome,
    pub submitted: usize,
    pub failed: usize,
}

impl FlushReport {
    fn skipped(outcome: FlushOutcome) -> Self {
        Self {
            outcome,
            submitted: 0,
            failed: 0,
        }
    }
}

/// Point-in-time view for the status surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub online: bool,
    pub flush_in_flight: bool,
    pub pending_writes: usize,
    pub last_flush_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Clears the in-flight flag when a flush pass unwinds, on every exit path.
struct InFlightReset<'a>(&'a AtomicBool);

impl Drop for InFlightReset<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Replays the pending-write queue against the backend, one entry at a
/// time, with at most one pass in flight per coordinator.
pub struct SyncCoordinator {
    api: Arc<dyn ProductsApi>,
    queue: Arc<PendingQueue>,
    monitor: Arc<ConnectivityMonitor>,
    events: Arc<dyn DomainEventSink>,
    in_flight: AtomicBool,
    last_flush_at: RwLock<Option<DateTime<Utc>>>,
    last_error: RwLock<Option<String>>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl SyncCoordinator {
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
            in_flight: AtomicBool::new(false),
            last_flush_at: RwLock::new(None),
            last_error: RwLock::new(None),
            watcher: Mutex::new(None),
        }
    }

    /// Replay the queued writes oldest-first.
    ///
    /// Entries the backend acknowledges are removed; anything else stays
    /// queued for the next pass, logged per entry. Entries enqueued while
    /// the pass runs are not picked up until the next trigger.
    pub async fn flush(&self) -> FlushReport {
        // The flag must be taken before the first await so concurrent
        // triggers cannot both pass the gate.
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("[Sync] Flush already in flight, skipping trigger");
            return FlushReport::skipped(FlushOutcome::AlreadyRunning);
        }
        let _reset = InFlightReset(&self.in_flight);

        if !self.monitor.is_online() {
            debug!("[Sync] Offline, flush deferred");
            return FlushReport::skipped(FlushOutcome::Offline);
        }

        let entries = self.queue.list().await;
        if !entries.is_empty() {
            info!("[Sync] Replaying {} pending write(s)", entries.len());
        }

        let mut submitted = 0;
        let mut failed = 0;
        let mut first_error: Option<String> = None;

        for entry in entries {
            match self.api.submit_product(&entry.payload).await {
                Ok(_) => {
                    self.queue.remove(entry.id).await;
                    self.events.publish(DomainEvent::WriteReplayed {
                        id: entry.id.to_string(),
                    });
                    submitted += 1;
                }
                Err(err) => {
                    warn!(
                        "[Sync] Pending write {} failed to replay, keeping it queued: {}",
                        entry.id, err
                    );
                    if first_error.is_none() {
                        first_error = Some(err.to_string());
                    }
                    failed += 1;
                }
            }
        }

        *self.last_flush_at.write().unwrap() = Some(Utc::now());
        *self.last_error.write().unwrap() = first_error;
        self.events
            .publish(DomainEvent::FlushCompleted { submitted, failed });
        if submitted > 0 || failed > 0 {
            info!(
                "[Sync] Flush pass done: {} submitted, {} still queued",
                submitted, failed
            );
        }

        FlushReport {
            outcome: FlushOutcome::Completed,
            submitted,
            failed,
        }
    }

    /// Start the connectivity watcher if it is not already running.
    ///
    /// The watcher makes one initial flush attempt, then wakes on every
    /// connectivity transition, flushing whenever the state lands on
    /// online. Repeated calls are no-ops while the task is alive.
    pub fn start(self: &Arc<Self>) {
        let mut guard = self.watcher.lock().unwrap();
        if let Some(handle) = guard.as_ref() {
            if !handle.is_finished() {
                debug!("[Sync] Watcher already running");
                return;
            }
        }

        let coordinator = Arc::clone(self);
        *guard = Some(tokio::spawn(async move {
            let mut transitions = coordinator.monitor.subscribe();
            coordinator.flush().await;
            while transitions.changed().await.is_ok() {
                let online = *transitions.borrow_and_update();
                coordinator
                    .events
                    .publish(DomainEvent::ConnectivityChanged { online });
                if online {
                    info!("[Sync] Connectivity restored, flushing pending writes");
                    coordinator.flush().await;
                } else {
                    info!("[Sync] Connectivity lost");
                }
            }
        }));
    }

    /// Stop the watcher task, if any.
    pub fn stop(&self) {
        if let Some(handle) = self.watcher.lock().unwrap().take() {
            handle.abort();
            debug!("[Sync] Watcher stopped");
        }
    }

    pub async fn status(&self) -> SyncStatus {
        SyncStatus {
            online: self.monitor.is_online(),
            flush_in_flight: self.in_flight.load(Ordering::SeqCst),
            pending_writes: self.queue.len().await,
            last_flush_at: *self.last_flush_at.read().unwrap(),
            last_error: self.last_error.read().unwrap().clone(),
        }
    }
}
