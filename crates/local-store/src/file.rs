//! File-backed store: one JSON document per key under a data directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{LocalStore, Result, StoreError};

/// Persistent store writing each key to `<data_dir>/<key>.json`.
///
/// Writes land in a temp file and are renamed into place so a crash mid-write
/// cannot leave a half-written document behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    /// Directory this store reads and writes under.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.data_dir.join(format!("{}.json", key)))
    }

    fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, path)
    }
}

fn join_error(err: tokio::task::JoinError) -> StoreError {
    StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, err))
}

#[async_trait]
impl LocalStore for FileStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        let path = self.path_for(key)?;
        tokio::task::spawn_blocking(move || Self::write_atomic(&path, &bytes))
            .await
            .map_err(join_error)??;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        let read = tokio::task::spawn_blocking(move || std::fs::read(&path))
            .await
            .map_err(join_error)?;
        match read {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let removed = tokio::task::spawn_blocking(move || std::fs::remove_file(&path))
            .await
            .map_err(join_error)?;
        match removed {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Io(err)),
        }
    }
}
