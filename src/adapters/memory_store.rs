use crate::domain::model::CachedDocument;
use crate::domain::ports::DocumentStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-process document store backed by a plain list, matching the
/// serialized persistence layout one-to-one.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    entries: Arc<Mutex<Vec<CachedDocument>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load(&self) -> Result<Vec<CachedDocument>> {
        Ok(self.entries.lock().await.clone())
    }

    async fn save(&self, entries: &[CachedDocument]) -> Result<()> {
        *self.entries.lock().await = entries.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = InMemoryDocumentStore::new();
        assert!(store.load().await.unwrap().is_empty());

        let entry = CachedDocument {
            quote_id: Uuid::new_v4(),
            checksum: "abc123".to_string(),
            bytes: b"document".to_vec(),
            filename: "QT-1.pdf".to_string(),
            created_at: Utc::now(),
            size_bytes: 8,
        };
        store.save(std::slice::from_ref(&entry)).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, vec![entry]);
    }
}
