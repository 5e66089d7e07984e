//! Error types for the catalog API client.

use thiserror::Error;

use tessera_core::BackendError;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Failures raised while talking to the catalog backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure; the backend never produced a verdict.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A success response carried a body that could not be decoded.
    #[error("Unexpected response: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing or malformed credentials.
    #[error("Authentication error: {0}")]
    Auth(String),
}

impl ApiError {
    /// Create an API error from status and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// HTTP status if the backend produced a verdict.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Normalization into the core taxonomy: transport failures become
/// queueable network errors, everything with a backend verdict stays a
/// rejection the caller sees.
impl From<ApiError> for BackendError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http(source) => BackendError::network(source.to_string()),
            ApiError::Api { status, message } => BackendError::rejected(status, message),
            ApiError::Json(source) => BackendError::invalid_response(source.to_string()),
            ApiError::Auth(message) => BackendError::auth(message),
        }
    }
}
