//! Product records and the offline-aware create path.

mod model;
mod service;

pub use model::{NewProduct, Product};
pub use service::{CreateOutcome, ProductService, ProductsApi};
