use crate::domain::model::{CachedDocument, Quote};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Backing store for cached documents. The persistence layout is a plain
/// list of records serialized as-is; eviction and TTL policy live in the
/// cache, not here.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load(&self) -> Result<Vec<CachedDocument>>;
    async fn save(&self, entries: &[CachedDocument]) -> Result<()>;
}

/// External collaborator that turns a quote into document bytes. Treated as
/// a black box; failures propagate to the caller unmodified.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, quote: &Quote) -> Result<Vec<u8>>;
}
