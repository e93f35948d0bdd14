use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use crate::domain::model::{
    round2, BreakdownCategory, CompanyInfo, CustomerInfo, PriceEstimate, Quote, QuoteItem,
    QuoteStatus, ServiceDetails,
};
use crate::utils::error::{FieldError, QuoteError, Result};
use crate::utils::validation;

/// German standard VAT.
pub const DEFAULT_VAT_RATE: f64 = 0.19;
/// Quotes expire 30 days after creation.
pub const DEFAULT_VALIDITY_DAYS: i64 = 30;
/// Totals above this raise a non-blocking warning.
const HIGH_TOTAL_THRESHOLD: f64 = 10_000.0;

const NUMBER_PREFIX: &str = "QT";

/// Non-blocking problems the caller may surface; none of these prevent
/// quote creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteWarning {
    MissingPhone,
    UnusuallyHighTotal,
}

impl QuoteWarning {
    pub fn message(&self) -> &'static str {
        match self {
            QuoteWarning::MissingPhone => "customer has no phone number on file",
            QuoteWarning::UnusuallyHighTotal => {
                "total is unusually high; consider a manual review before sending"
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssemblyOutcome {
    pub quote: Quote,
    pub warnings: Vec<QuoteWarning>,
}

pub struct QuoteAssembler {
    vat_rate: f64,
    validity: Duration,
}

impl QuoteAssembler {
    pub fn new(vat_rate: f64, validity: Duration) -> Self {
        Self { vat_rate, validity }
    }

    /// Convert an estimate plus customer and company data into an immutable
    /// draft quote. Field-level validation failures are returned as data;
    /// warnings come back alongside the quote and never block it.
    pub fn assemble(
        &self,
        estimate: &PriceEstimate,
        service: ServiceDetails,
        customer: CustomerInfo,
        company: CompanyInfo,
        notes: Option<String>,
    ) -> Result<AssemblyOutcome> {
        let created_at = Utc::now();
        self.assemble_at(estimate, service, customer, company, notes, created_at)
    }

    /// Same as [`assemble`](Self::assemble) with an explicit creation time,
    /// used by tests to pin the validity window.
    pub fn assemble_at(
        &self,
        estimate: &PriceEstimate,
        service: ServiceDetails,
        customer: CustomerInfo,
        company: CompanyInfo,
        notes: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<AssemblyOutcome> {
        let items = build_items(estimate, &service);

        let subtotal = round2(items.iter().map(|i| i.total_price).sum());
        let vat_amount = round2(subtotal * self.vat_rate);
        let total_amount = round2(subtotal + vat_amount);

        self.validate(&customer, &items, total_amount)?;

        let mut warnings = Vec::new();
        if customer.phone.as_deref().map_or(true, |p| p.trim().is_empty()) {
            warnings.push(QuoteWarning::MissingPhone);
        }
        if total_amount > HIGH_TOTAL_THRESHOLD {
            warnings.push(QuoteWarning::UnusuallyHighTotal);
        }

        let quote = Quote {
            id: Uuid::new_v4(),
            number: generate_number(created_at),
            created_at,
            valid_until: created_at + self.validity,
            status: QuoteStatus::Draft,
            customer,
            company,
            service,
            items,
            subtotal,
            vat_amount,
            total_amount,
            notes,
        };
        debug!(number = %quote.number, total = quote.total_amount, "quote assembled");

        Ok(AssemblyOutcome { quote, warnings })
    }

    fn validate(
        &self,
        customer: &CustomerInfo,
        items: &[QuoteItem],
        total_amount: f64,
    ) -> Result<()> {
        let mut errors: Vec<FieldError> = Vec::new();

        validation::check_non_empty("customer.name", &customer.name, &mut errors);
        validation::check_email("customer.email", &customer.email, &mut errors);
        if items.is_empty() {
            errors.push(FieldError::new("items", "quote must contain at least one item"));
        }
        if total_amount <= 0.0 {
            errors.push(FieldError::new(
                "total_amount",
                format!("total must be positive, got {}", total_amount),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(QuoteError::Validation(errors))
        }
    }
}

impl Default for QuoteAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_VAT_RATE, Duration::days(DEFAULT_VALIDITY_DAYS))
    }
}

/// Re-express breakdown lines for display: the base line carries the real
/// quantity and unit, adjustment lines are flat one-off positions.
fn build_items(estimate: &PriceEstimate, service: &ServiceDetails) -> Vec<QuoteItem> {
    estimate
        .breakdown
        .iter()
        .map(|line| match line.category {
            BreakdownCategory::Base if service.quantity > 0.0 => QuoteItem {
                description: line.label.clone(),
                quantity: service.quantity,
                unit: service.unit_label.clone(),
                unit_price: round2(line.amount / service.quantity),
                total_price: line.amount,
            },
            _ => QuoteItem {
                description: line.label.clone(),
                quantity: 1.0,
                unit: "flat".to_string(),
                unit_price: line.amount,
                total_price: line.amount,
            },
        })
        .collect()
}

/// `QT-YYYYMMDD-HHMMSSrrr`: fixed prefix, date, and a time + random-digit
/// suffix. Collision-resistant enough for a display number, nothing more.
fn generate_number(created_at: DateTime<Utc>) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..1000);
    format!(
        "{}-{}-{}{:03}",
        NUMBER_PREFIX,
        created_at.format("%Y%m%d"),
        created_at.format("%H%M%S"),
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::RateCatalog;
    use crate::core::pricing::PricingEngine;
    use crate::domain::model::{
        CalculatorInput, Frequency, Location, ServiceCategory, Urgency,
    };

    fn estimate_for(quantity: f64) -> (PriceEstimate, ServiceDetails) {
        let engine = PricingEngine::new(RateCatalog::default());
        let input = CalculatorInput {
            service_category: ServiceCategory::OfficeCleaning,
            quantity,
            location: Location::Hamburg,
            frequency: Frequency::Weekly,
            additional_services: vec![],
            urgency: Urgency::Standard,
            deep_clean: false,
            building_complexity: None,
            access_difficulty: None,
            security_level: None,
            elevator_access: None,
            parking_available: None,
        };
        let estimate = engine.estimate(&input).unwrap();
        let service = ServiceDetails {
            category: input.service_category,
            quantity: input.quantity,
            unit_label: estimate.unit_label.clone(),
            frequency: input.frequency,
            location: input.location,
        };
        (estimate, service)
    }

    fn customer() -> CustomerInfo {
        CustomerInfo {
            name: "Anna Schmidt".to_string(),
            email: "anna@example.com".to_string(),
            phone: Some("+49 30 1234567".to_string()),
            address: None,
        }
    }

    fn company() -> CompanyInfo {
        CompanyInfo {
            name: "CleanCo GmbH".to_string(),
            address: "Hauptstr. 1, 10115 Berlin".to_string(),
            email: "info@cleanco.example".to_string(),
            phone: None,
            vat_id: Some("DE123456789".to_string()),
        }
    }

    #[test]
    fn totals_satisfy_the_vat_invariant() {
        let (estimate, service) = estimate_for(150.0);
        let outcome = QuoteAssembler::default()
            .assemble(&estimate, service, customer(), company(), None)
            .unwrap();
        let quote = outcome.quote;

        let item_sum = round2(quote.items.iter().map(|i| i.total_price).sum());
        assert_eq!(quote.subtotal, item_sum);
        assert_eq!(quote.vat_amount, round2(quote.subtotal * 0.19));
        assert_eq!(
            quote.total_amount,
            round2(quote.subtotal + quote.vat_amount)
        );
        assert_eq!(quote.status, QuoteStatus::Draft);
        assert_eq!(quote.items.len(), estimate.breakdown.len());
    }

    #[test]
    fn base_item_carries_quantity_and_unit_price() {
        let (estimate, service) = estimate_for(150.0);
        let outcome = QuoteAssembler::default()
            .assemble(&estimate, service, customer(), company(), None)
            .unwrap();

        let base = &outcome.quote.items[0];
        assert_eq!(base.quantity, 150.0);
        assert_eq!(base.unit, "m²");
        assert_eq!(base.unit_price, round2(base.total_price / 150.0));

        // Adjustment lines are flat positions.
        let adjustment = &outcome.quote.items[1];
        assert_eq!(adjustment.quantity, 1.0);
        assert_eq!(adjustment.unit, "flat");
        assert_eq!(adjustment.unit_price, adjustment.total_price);
    }

    #[test]
    fn quote_number_has_prefix_date_and_suffix() {
        let (estimate, service) = estimate_for(150.0);
        let created_at = "2026-08-29T14:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let outcome = QuoteAssembler::default()
            .assemble_at(&estimate, service, customer(), company(), None, created_at)
            .unwrap();

        let number = &outcome.quote.number;
        assert!(number.starts_with("QT-20260829-143000"), "{}", number);
        assert_eq!(number.len(), "QT-20260829-143000123".len());
        assert_eq!(
            outcome.quote.valid_until,
            created_at + Duration::days(30)
        );
    }

    #[test]
    fn missing_customer_fields_are_all_reported() {
        let (estimate, service) = estimate_for(150.0);
        let bad_customer = CustomerInfo {
            name: "  ".to_string(),
            email: "not-an-email".to_string(),
            phone: None,
            address: None,
        };

        let err = QuoteAssembler::default()
            .assemble(&estimate, service, bad_customer, company(), None)
            .unwrap_err();
        match err {
            QuoteError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.field == "customer.name"));
                assert!(errors.iter().any(|e| e.field == "customer.email"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn empty_estimate_cannot_become_a_quote() {
        let (mut estimate, service) = estimate_for(150.0);
        estimate.breakdown.clear();

        let err = QuoteAssembler::default()
            .assemble(&estimate, service, customer(), company(), None)
            .unwrap_err();
        match err {
            QuoteError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.field == "items"));
                assert!(errors.iter().any(|e| e.field == "total_amount"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn warnings_do_not_block_creation() {
        let (estimate, service) = estimate_for(9000.0);
        let mut no_phone = customer();
        no_phone.phone = None;

        let outcome = QuoteAssembler::default()
            .assemble(&estimate, service, no_phone, company(), None)
            .unwrap();

        assert!(outcome.warnings.contains(&QuoteWarning::MissingPhone));
        assert!(outcome
            .warnings
            .contains(&QuoteWarning::UnusuallyHighTotal));
        assert_eq!(outcome.quote.status, QuoteStatus::Draft);
    }

    #[test]
    fn notes_do_not_affect_pricing_fields() {
        let (estimate, service) = estimate_for(150.0);
        let assembler = QuoteAssembler::default();
        let with_notes = assembler
            .assemble(
                &estimate,
                service.clone(),
                customer(),
                company(),
                Some("please call before arrival".to_string()),
            )
            .unwrap();
        let without_notes = assembler
            .assemble(&estimate, service, customer(), company(), None)
            .unwrap();

        assert_eq!(with_notes.quote.subtotal, without_notes.quote.subtotal);
        assert_eq!(with_notes.quote.items, without_notes.quote.items);
        assert_eq!(
            with_notes.quote.total_amount,
            without_notes.quote.total_amount
        );
    }
}
