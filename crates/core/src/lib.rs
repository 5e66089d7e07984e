//! Core domain logic for the tessera catalog client: reference data caching,
//! the offline pending-write queue, and the sync coordinator that replays it.

pub mod errors;
pub mod events;
pub mod pricing;
pub mod products;
pub mod queue;
pub mod reference;
pub mod sync;

pub use errors::{BackendError, Error, Result};
