//! Connectivity probe for embeddings without a host online/offline signal.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use rand::Rng;
use tokio::task::JoinHandle;

use tessera_core::sync::ConnectivityMonitor;

use crate::client::CatalogApiClient;

/// Default probe cadence in seconds.
pub const PROBE_INTERVAL_SECS: u64 = 30;

/// Maximum jitter (milliseconds) added to each probe wait.
const PROBE_JITTER_MS: u64 = 500;

/// Spawn a task that polls the health endpoint and feeds the monitor.
///
/// Each wait gets a small random jitter so a fleet of clients does not
/// probe in lockstep. The caller owns the returned handle.
pub fn run_connectivity_probe(
    client: Arc<CatalogApiClient>,
    monitor: Arc<ConnectivityMonitor>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let online = client.health_check().await.is_ok();
            if monitor.set_online(online) {
                debug!("[Sync] Probe moved connectivity to online={}", online);
            }
            let jitter = rand::thread_rng().gen_range(0..=PROBE_JITTER_MS);
            tokio::time::sleep(interval + Duration::from_millis(jitter)).await;
        }
    })
}
