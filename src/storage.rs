//! Files served and stored under `/files/`.
//!
//! Names are joined onto the base directory as given. Nothing stops `..`
//! from walking out of it, and concurrent writers to one name race with the
//! last one winning.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("storage error on {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        FileStore { base: base.into() }
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.base.join(name)
    }

    pub async fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_of(name);
        let result = tokio::fs::read(&path).await;
        match result {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound(path)),
            Err(source) => Err(StoreError::Storage { path, source }),
        }
    }

    /// Creates or truncates `name` and writes `contents` to it.
    pub async fn write(&self, name: &str, contents: &[u8]) -> Result<(), StoreError> {
        let path = self.path_of(name);
        let result = tokio::fs::write(&path, contents).await;
        result.map_err(|source| StoreError::Storage { path, source })
    }
}
