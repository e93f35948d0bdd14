use crate::domain::model::Quote;
use crate::domain::ports::DocumentRenderer;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::fmt::Write as _;

/// Deterministic plain-text rendering of a quote. Stands in for the real
/// PDF collaborator so the CLI and the cache have a concrete renderer;
/// identical quotes always produce identical bytes.
#[derive(Debug, Clone, Default)]
pub struct PlainTextRenderer;

impl PlainTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentRenderer for PlainTextRenderer {
    async fn render(&self, quote: &Quote) -> Result<Vec<u8>> {
        let mut out = String::new();
        let _ = writeln!(out, "QUOTATION {}", quote.number);
        let _ = writeln!(out, "{}", quote.company.name);
        let _ = writeln!(out, "{}", quote.company.address);
        let _ = writeln!(out);
        let _ = writeln!(out, "For: {} <{}>", quote.customer.name, quote.customer.email);
        let _ = writeln!(
            out,
            "Service: {}, {} {} ({}, {})",
            quote.service.category.label(),
            quote.service.quantity,
            quote.service.unit_label,
            quote.service.frequency.label(),
            quote.service.location.label(),
        );
        let _ = writeln!(out);
        for item in &quote.items {
            let _ = writeln!(
                out,
                "{:<46} {:>8.2} {} x {:>8.2}  = {:>10.2}",
                item.description, item.quantity, item.unit, item.unit_price, item.total_price
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<60} {:>10.2}", "Subtotal", quote.subtotal);
        let _ = writeln!(out, "{:<60} {:>10.2}", "VAT", quote.vat_amount);
        let _ = writeln!(out, "{:<60} {:>10.2}", "Total", quote.total_amount);
        let _ = writeln!(
            out,
            "\nCreated {}, valid until {}",
            quote.created_at.format("%Y-%m-%d"),
            quote.valid_until.format("%Y-%m-%d")
        );
        if let Some(notes) = &quote.notes {
            let _ = writeln!(out, "\nNotes: {}", notes);
        }
        Ok(out.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        CompanyInfo, CustomerInfo, Frequency, Location, QuoteItem, QuoteStatus, ServiceCategory,
        ServiceDetails,
    };
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn quote() -> Quote {
        let now = Utc::now();
        Quote {
            id: Uuid::new_v4(),
            number: "QT-20260829-120000123".to_string(),
            created_at: now,
            valid_until: now + Duration::days(30),
            status: QuoteStatus::Draft,
            customer: CustomerInfo {
                name: "Anna Schmidt".to_string(),
                email: "anna@example.com".to_string(),
                phone: None,
                address: None,
            },
            company: CompanyInfo {
                name: "CleanCo GmbH".to_string(),
                address: "Hauptstr. 1, 10115 Berlin".to_string(),
                email: "info@cleanco.example".to_string(),
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
                unit_price: 6.5,
                total_price: 974.25,
            }],
            subtotal: 974.25,
            vat_amount: 185.11,
            total_amount: 1159.36,
            notes: None,
        }
    }

    #[tokio::test]
    async fn rendering_is_deterministic() {
        let renderer = PlainTextRenderer::new();
        let quote = quote();
        let first = renderer.render(&quote).await.unwrap();
        let second = renderer.render(&quote).await.unwrap();
        assert_eq!(first, second);

        let text = String::from_utf8(first).unwrap();
        assert!(text.contains("QUOTATION QT-20260829-120000123"));
        assert!(text.contains("Total"));
        assert!(text.contains("1159.36"));
    }
}
