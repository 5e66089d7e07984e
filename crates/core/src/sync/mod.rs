//! Offline synchronization: the connectivity signal and the flush
//! coordinator that replays queued writes when the backend is reachable.

mod connectivity;
mod coordinator;

pub use connectivity::ConnectivityMonitor;
pub use coordinator::{FlushOutcome, FlushReport, SyncCoordinator, SyncStatus};

#[cfg(test)]
mod tests;
