//! Catalog API client for the tessera backend.
//!
//! Thin reqwest wrapper: bearer-token session, shared response parsing,
//! and the trait impls the core services consume.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use tessera_core::products::{Product, ProductsApi};
use tessera_core::reference::{ReferenceItem, ReferenceKind, ReferencesApi};
use tessera_core::BackendError;

use crate::error::{ApiError, Result};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_LOG_BODY_CHARS: usize = 512;

/// Error body shape the backend uses for non-success responses.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    code: String,
    message: String,
}

/// Credentials for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Session returned by a successful login. Set once per login; there is
/// no refresh flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub access_token: String,
    pub display_name: String,
    pub role: String,
}

/// Client for the catalog backend API.
pub struct CatalogApiClient {
    client: reqwest::Client,
    base_url: String,
    session: RwLock<Option<AuthSession>>,
}

impl CatalogApiClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the backend (e.g., "https://catalog.example.com")
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session: RwLock::new(None),
        }
    }

    /// Session from the last successful login, if any.
    pub fn session(&self) -> Option<AuthSession> {
        self.session.read().unwrap().clone()
    }

    /// Create headers for an authenticated API request.
    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let session = self.session().ok_or_else(|| ApiError::auth("Not logged in"))?;
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", session.access_token))
            .map_err(|_| ApiError::auth("Invalid access token format"))?;
        headers.insert(AUTHORIZATION, auth_value);

        Ok(headers)
    }

    fn log_response(status: reqwest::StatusCode, body: &str) {
        if status.is_success() {
            debug!("API response status: {}", status);
            return;
        }

        let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
        if body.chars().count() > MAX_LOG_BODY_CHARS {
            preview.push_str("...");
        }
        debug!("API response error ({}): {}", status, preview);
    }

    /// Parse a JSON response body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);

        if !status.is_success() {
            // Try to parse error response
            if let Ok(error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(ApiError::api(
                    status.as_u16(),
                    format!("{}: {}", error.code, error.message),
                ));
            }
            return Err(ApiError::api(
                status.as_u16(),
                format!("Request failed: {}", body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!(
                "Failed to deserialize response. Body: {}, Error: {}",
                body,
                e
            );
            ApiError::from(e)
        })
    }

    /// POST /api/auth/login
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthSession> {
        let url = format!("{}/api/auth/login", self.base_url);
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(request)
            .send()
            .await?;

        let session: AuthSession = Self::parse_response(response).await?;
        debug!("Logged in as {}", session.display_name);
        *self.session.write().unwrap() = Some(session.clone());
        Ok(session)
    }

    /// GET /api/references/{kind}
    pub async fn list_reference(&self, kind: ReferenceKind) -> Result<Vec<ReferenceItem>> {
        let url = format!("{}/api/references/{}", self.base_url, kind.api_path());

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// POST /api/products
    pub async fn create_product(&self, payload: &serde_json::Value) -> Result<Product> {
        let url = format!("{}/api/products", self.base_url);

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(payload)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// GET /api/products
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let url = format!("{}/api/products", self.base_url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// GET /api/health
    ///
    /// Unauthenticated; the connectivity probe's target.
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/api/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::api(status.as_u16(), "Health check failed"))
        }
    }
}

#[async_trait]
impl ReferencesApi for CatalogApiClient {
    async fn list_reference(
        &self,
        kind: ReferenceKind,
    ) -> std::result::Result<Vec<ReferenceItem>, BackendError> {
        CatalogApiClient::list_reference(self, kind)
            .await
            .map_err(BackendError::from)
    }
}

#[async_trait]
impl ProductsApi for CatalogApiClient {
    async fn submit_product(
        &self,
        payload: &serde_json::Value,
    ) -> std::result::Result<Product, BackendError> {
        self.create_product(payload)
            .await
            .map_err(BackendError::from)
    }

    async fn list_products(&self) -> std::result::Result<Vec<Product>, BackendError> {
        CatalogApiClient::list_products(self)
            .await
            .map_err(BackendError::from)
    }
}
