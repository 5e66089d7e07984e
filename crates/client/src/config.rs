//! Typed runtime configuration read from the environment.

use std::path::PathBuf;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_DATA_DIR: &str = ".tessera";

/// Configuration for the client shell.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the catalog backend.
    pub api_url: String,
    /// Directory holding the local store documents.
    pub data_dir: PathBuf,
}

impl ClientConfig {
    /// Read `TESSERA_API_URL` and `TESSERA_DATA_DIR`, falling back to the
    /// defaults when unset.
    pub fn from_env() -> Self {
        let api_url =
            std::env::var("TESSERA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let data_dir = std::env::var("TESSERA_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
        Self { api_url, data_dir }
    }

    pub fn new(api_url: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_url: api_url.into(),
            data_dir: data_dir.into(),
        }
    }
}
