use crate::domain::model::CachedDocument;
use crate::domain::ports::DocumentStore;
use crate::utils::error::{QuoteError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Document store persisted as one JSON file holding the whole entry list
/// serialized as-is. A missing file reads as an empty store; a corrupt file
/// is reported as a storage error, which the cache degrades around.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    path: PathBuf,
}

impl FileDocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn load(&self) -> Result<Vec<CachedDocument>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read(&self.path)?;
        serde_json::from_slice(&data).map_err(|e| QuoteError::Storage {
            message: format!("corrupt cache file {}: {}", self.path.display(), e),
        })
    }

    async fn save(&self, entries: &[CachedDocument]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec(entries)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }
}
