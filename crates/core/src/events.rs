//! Domain events published after mutations.
//!
//! Consumers subscribe explicitly; mutating components publish. There is no
//! implicit field-level reactivity anywhere in the core.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::reference::ReferenceKind;

/// Events emitted by core services after state changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum DomainEvent {
    /// The full reference snapshot was replaced after a successful load.
    ReferenceSnapshotReplaced { kinds: usize },
    /// One reference kind's list was replaced in memory.
    ReferenceKindUpdated { kind: ReferenceKind, items: usize },
    /// A product create was accepted directly by the backend.
    ProductCreated { id: String },
    /// A create could not be confirmed and was queued for replay.
    WriteQueued { id: String },
    /// A queued write was accepted by the backend during a flush.
    WriteReplayed { id: String },
    /// A flush pass finished.
    FlushCompleted { submitted: usize, failed: usize },
    /// The connectivity monitor observed a transition.
    ConnectivityChanged { online: bool },
}

/// Sink receiving domain events after mutations.
pub trait DomainEventSink: Send + Sync {
    fn publish(&self, event: DomainEvent);
}

/// Sink that drops every event. For tests and headless embeddings.
#[derive(Debug, Default)]
pub struct NullEventSink;

impl DomainEventSink for NullEventSink {
    fn publish(&self, _event: DomainEvent) {}
}

/// Broadcast-backed sink the view layer subscribes to.
#[derive(Debug)]
pub struct BroadcastEventSink {
    sender: broadcast::Sender<DomainEvent>,
}

impl BroadcastEventSink {
    /// Create a sink buffering up to `capacity` undelivered events per receiver.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastEventSink {
    fn default() -> Self {
        Self::new(64)
    }
}

impl DomainEventSink for BroadcastEventSink {
    fn publish(&self, event: DomainEvent) {
        // Errors only mean nobody is subscribed right now.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let sink = BroadcastEventSink::default();
        let mut rx = sink.subscribe();
        sink.publish(DomainEvent::WriteQueued {
            id: "w-1".to_string(),
        });
        let event = rx.recv().await.expect("event delivered");
        assert_eq!(
            event,
            DomainEvent::WriteQueued {
                id: "w-1".to_string()
            }
        );
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let sink = BroadcastEventSink::default();
        sink.publish(DomainEvent::ConnectivityChanged { online: false });
    }
}
