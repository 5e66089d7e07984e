//! Reference ("metadata") lists: the closed kind set, record shapes, and the
//! cached snapshot served to the view layer.

mod cache;
mod kind;
mod model;

pub use cache::{ReferenceCache, ReferencesApi, REFERENCE_SNAPSHOT_KEY};
pub use kind::ReferenceKind;
pub use model::{ReferenceItem, ReferenceSnapshot};
