//! HTTP client, configuration, and application assembly for the tessera
//! catalog backend.

mod client;
mod config;
mod context;
mod error;
mod probe;

pub use client::{AuthSession, CatalogApiClient, LoginRequest};
pub use config::ClientConfig;
pub use context::AppContext;
pub use error::{ApiError, Result};
pub use probe::{run_connectivity_probe, PROBE_INTERVAL_SECS};
