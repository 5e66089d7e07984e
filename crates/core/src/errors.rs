//! Error types shared across the catalog core.

use thiserror::Error;

use crate::reference::ReferenceKind;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by backend-facing calls, normalized away from any
/// concrete HTTP client.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport failure: the request never produced a backend verdict.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The backend answered but the body could not be decoded.
    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    /// Missing or malformed credentials.
    #[error("authentication error: {0}")]
    Auth(String),
}

impl BackendError {
    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create a rejection from status and message.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Create an auth error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// HTTP status if the backend produced a verdict.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the failure happened before the backend could rule on the
    /// payload. Such writes are queued for replay instead of surfaced.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Errors surfaced by core services.
#[derive(Debug, Error)]
pub enum Error {
    /// A reference-list fetch failed; callers fall back to the cached snapshot.
    #[error("metadata fetch failed for {kind}: {source}")]
    MetadataFetch {
        kind: ReferenceKind,
        #[source]
        source: BackendError,
    },

    /// The backend rejected a direct create; the caller owns the fix.
    #[error("write submission failed: {0}")]
    WriteSubmission(#[source] BackendError),

    /// Persistent store failure that could not be absorbed fail-open.
    #[error(transparent)]
    Storage(#[from] tessera_local_store::StoreError),

    /// Backend failure outside the taxonomy above (list reads, login).
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Payload (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
