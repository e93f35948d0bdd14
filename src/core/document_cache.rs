use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use tracing::{debug, warn};

use crate::domain::model::{CachedDocument, Quote, RenderedDocument};
use crate::domain::ports::{DocumentRenderer, DocumentStore};
use crate::utils::error::Result;

/// Bump when the checksum payload format changes, so entries written by an
/// older format can never read as fresh hits.
const CHECKSUM_VERSION: &str = "v1";

pub const DEFAULT_TTL_SECONDS: i64 = 3600;
pub const DEFAULT_CAPACITY: usize = 20;

/// Fingerprint of the price-relevant subset of a quote: id, total, item
/// descriptions and amounts, customer email, creation time. Metadata such as
/// notes or status is deliberately excluded, so editing it never invalidates
/// a cached document, while any price-affecting change does.
pub fn quote_checksum(quote: &Quote) -> String {
    let mut payload = format!(
        "{}|{}|{:.2}|{}|{}",
        CHECKSUM_VERSION,
        quote.id,
        quote.total_amount,
        quote.customer.email,
        quote.created_at.to_rfc3339(),
    );
    for item in &quote.items {
        let _ = write!(payload, "|{}:{:.2}", item.description, item.total_price);
    }

    let digest = Sha256::digest(payload.as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{:02x}", byte);
    }
    hex
}

fn document_filename(quote: &Quote) -> String {
    format!("{}.pdf", quote.number)
}

/// Checksum-keyed, size- and time-bounded store of rendered documents.
///
/// Purely an optimization: clearing it never changes the correctness of
/// subsequently rendered documents, since the quote stays authoritative and
/// a deterministic renderer reproduces identical bytes.
pub struct DocumentCache<S: DocumentStore> {
    store: S,
    ttl: Duration,
    capacity: usize,
    // Serializes the lookup -> render -> insert sequence so a stale write
    // can never evict a newer entry.
    write_lock: tokio::sync::Mutex<()>,
}

impl<S: DocumentStore> DocumentCache<S> {
    pub fn new(store: S, ttl: Duration, capacity: usize) -> Self {
        Self {
            store,
            ttl,
            capacity,
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn with_defaults(store: S) -> Self {
        Self::new(
            store,
            Duration::seconds(DEFAULT_TTL_SECONDS),
            DEFAULT_CAPACITY,
        )
    }

    /// Return the cached document for this quote, rendering it through the
    /// injected renderer on any miss.
    ///
    /// Render failures propagate unmodified and are never cached. Store
    /// failures degrade to render-fresh; they never fail the request.
    pub async fn get_or_render<R: DocumentRenderer>(
        &self,
        quote: &Quote,
        renderer: &R,
    ) -> Result<RenderedDocument> {
        let checksum = quote_checksum(quote);
        let filename = document_filename(quote);

        let _guard = self.write_lock.lock().await;

        let mut entries = match self.store.load().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "document store unavailable, rendering fresh");
                let bytes = renderer.render(quote).await?;
                return Ok(RenderedDocument {
                    bytes,
                    filename,
                    from_cache: false,
                });
            }
        };

        let now = Utc::now();
        let before = entries.len();
        // Drop expired entries, plus stale versions of this quote: an entry
        // with the same id but another checksum can never become valid again.
        entries.retain(|entry| {
            let expired = now - entry.created_at > self.ttl;
            let stale = entry.quote_id == quote.id && entry.checksum != checksum;
            !(expired || stale)
        });
        if entries.len() != before {
            debug!(removed = before - entries.len(), "evicted expired/stale documents");
        }

        if let Some(hit) = entries
            .iter()
            .find(|entry| entry.quote_id == quote.id && entry.checksum == checksum)
        {
            debug!(quote_id = %quote.id, "document cache hit");
            let document = RenderedDocument {
                bytes: hit.bytes.clone(),
                filename: hit.filename.clone(),
                from_cache: true,
            };
            // Evictions may have freed space even on a hit.
            self.persist(entries).await;
            return Ok(document);
        }

        debug!(quote_id = %quote.id, "document cache miss, rendering");
        let bytes = renderer.render(quote).await?;

        // At capacity the single oldest entry by creation time goes first
        // (insertion-time LRU; hit access time is intentionally not tracked).
        while entries.len() >= self.capacity {
            let Some(oldest) = entries
                .iter()
                .enumerate()
                .min_by_key(|(_, entry)| entry.created_at)
                .map(|(idx, _)| idx)
            else {
                break;
            };
            let removed = entries.remove(oldest);
            debug!(quote_id = %removed.quote_id, "capacity eviction");
        }

        entries.push(CachedDocument {
            quote_id: quote.id,
            checksum,
            bytes: bytes.clone(),
            filename: filename.clone(),
            created_at: now,
            size_bytes: bytes.len(),
        });
        self.persist(entries).await;

        Ok(RenderedDocument {
            bytes,
            filename,
            from_cache: false,
        })
    }

    /// Drop every cached document. Safe at any time; the next request
    /// simply renders fresh.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store.save(&[]).await
    }

    pub async fn len(&self) -> Result<usize> {
        Ok(self.store.load().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    async fn persist(&self, entries: Vec<CachedDocument>) {
        if let Err(e) = self.store.save(&entries).await {
            warn!(error = %e, "failed to persist document cache, continuing");
        }
    }
}
