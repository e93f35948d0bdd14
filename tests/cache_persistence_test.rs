use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use quote_engine::domain::model::{
    CompanyInfo, CustomerInfo, Frequency, Location, Quote, QuoteItem, QuoteStatus,
    ServiceCategory, ServiceDetails,
};
use quote_engine::domain::ports::DocumentRenderer;
use quote_engine::{DocumentCache, FileDocumentStore};
use tempfile::TempDir;
use uuid::Uuid;

struct CountingRenderer {
    calls: AtomicUsize,
}

impl CountingRenderer {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentRenderer for CountingRenderer {
    async fn render(&self, quote: &Quote) -> quote_engine::Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("QUOTE {}", quote.number).into_bytes())
    }
}

fn sample_quote() -> Quote {
    let created_at = Utc::now();
    Quote {
        id: Uuid::new_v4(),
        number: "QT-20250101-120000042".to_string(),
        created_at,
        valid_until: created_at + Duration::days(30),
        status: QuoteStatus::Draft,
        customer: CustomerInfo {
            name: "Acme GmbH".to_string(),
            email: "facilities@acme.example".to_string(),
            phone: None,
            address: None,
        },
        company: CompanyInfo {
            name: "CleanCo Services GmbH".to_string(),
            address: "Reeperbahn 10, 20359 Hamburg".to_string(),
            email: "quotes@cleanco.example".to_string(),
            phone: None,
            vat_id: None,
        },
        service: ServiceDetails {
            category: ServiceCategory::OfficeCleaning,
            quantity: 150.0,
            unit_label: "m²".to_string(),
            frequency: Frequency::Weekly,
            location: Location::Hamburg,
        },
        items: vec![QuoteItem {
            description: "Office cleaning (150 m²), per month".to_string(),
            quantity: 150.0,
            unit: "m²".to_string(),
            unit_price: 6.31,
            total_price: 946.97,
        }],
        subtotal: 946.97,
        vat_amount: 179.92,
        total_amount: 1126.89,
        notes: None,
    }
}

#[tokio::test]
async fn cache_survives_store_reopen() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("documents.json");
    let quote = sample_quote();

    let renderer = CountingRenderer::new();
    {
        let cache = DocumentCache::with_defaults(FileDocumentStore::new(&path));
        let first = cache.get_or_render(&quote, &renderer).await?;
        assert!(!first.from_cache);
    }
    assert!(path.exists());

    // A fresh cache over the same file finds the persisted document.
    let cache = DocumentCache::with_defaults(FileDocumentStore::new(&path));
    let second = cache.get_or_render(&quote, &renderer).await?;
    assert!(second.from_cache);
    assert_eq!(renderer.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn clear_empties_persisted_cache() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("documents.json");
    let quote = sample_quote();

    let cache = DocumentCache::with_defaults(FileDocumentStore::new(&path));
    let renderer = CountingRenderer::new();
    cache.get_or_render(&quote, &renderer).await?;
    assert_eq!(cache.len().await?, 1);

    cache.clear().await?;
    assert!(cache.is_empty().await?);

    // Reopening after clear re-renders.
    let reopened = DocumentCache::with_defaults(FileDocumentStore::new(&path));
    let doc = reopened.get_or_render(&quote, &renderer).await?;
    assert!(!doc.from_cache);
    assert_eq!(renderer.calls(), 2);
    Ok(())
}
