use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::error::{QuoteError, Result};

/// Round a monetary value to 2 decimal places. Applied only at the point a
/// value is stored into a breakdown line or a final total; intermediate
/// pipeline math keeps full floating precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    OfficeCleaning,
    WindowCleaning,
    StairwellCleaning,
    CarpetCleaning,
    FacadeCleaning,
    ConstructionCleaning,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 6] = [
        ServiceCategory::OfficeCleaning,
        ServiceCategory::WindowCleaning,
        ServiceCategory::StairwellCleaning,
        ServiceCategory::CarpetCleaning,
        ServiceCategory::FacadeCleaning,
        ServiceCategory::ConstructionCleaning,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ServiceCategory::OfficeCleaning => "Office cleaning",
            ServiceCategory::WindowCleaning => "Window cleaning",
            ServiceCategory::StairwellCleaning => "Stairwell cleaning",
            ServiceCategory::CarpetCleaning => "Carpet cleaning",
            ServiceCategory::FacadeCleaning => "Facade cleaning",
            ServiceCategory::ConstructionCleaning => "Post-construction cleaning",
        }
    }
}

/// What one `quantity` unit means for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingUnit {
    SquareMeters,
    Pieces,
}

impl BillingUnit {
    pub fn label(&self) -> &'static str {
        match self {
            BillingUnit::SquareMeters => "m²",
            BillingUnit::Pieces => "pcs",
        }
    }
}

/// Per-visit prices are converted to a monthly equivalent for recurring
/// service; per-project prices never are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingBasis {
    PerVisit,
    PerProject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    OneTime,
    Monthly,
    BiWeekly,
    Weekly,
    Daily,
}

impl Frequency {
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::OneTime => "one-time",
            Frequency::Monthly => "monthly",
            Frequency::BiWeekly => "every two weeks",
            Frequency::Weekly => "weekly",
            Frequency::Daily => "daily (5x per week)",
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, Frequency::OneTime)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Munich,
    Frankfurt,
    Hamburg,
    Berlin,
    Cologne,
    Other,
}

impl Location {
    pub fn label(&self) -> &'static str {
        match self {
            Location::Munich => "Munich",
            Location::Frankfurt => "Frankfurt",
            Location::Hamburg => "Hamburg",
            Location::Berlin => "Berlin",
            Location::Cologne => "Cologne",
            Location::Other => "other region",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdditionalService {
    WindowsInterior,
    Disinfection,
    TrashRemoval,
    UpholsteryCleaning,
}

impl AdditionalService {
    /// Fixed iteration order; selected add-ons are priced in this order so
    /// the breakdown is stable regardless of input ordering.
    pub const ALL: [AdditionalService; 4] = [
        AdditionalService::WindowsInterior,
        AdditionalService::Disinfection,
        AdditionalService::TrashRemoval,
        AdditionalService::UpholsteryCleaning,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AdditionalService::WindowsInterior => "Interior window cleaning",
            AdditionalService::Disinfection => "Surface disinfection",
            AdditionalService::TrashRemoval => "Trash removal",
            AdditionalService::UpholsteryCleaning => "Upholstery cleaning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Standard,
    Express,
    SameDay,
}

impl Urgency {
    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Standard => "standard",
            Urgency::Express => "express (48h)",
            Urgency::SameDay => "same day",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingComplexity {
    SingleStorey,
    MultiStorey,
    HighRise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDifficulty {
    Easy,
    Moderate,
    Difficult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    Unrestricted,
    Standard,
    High,
}

/// Validated calculator request. The engine never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorInput {
    pub service_category: ServiceCategory,
    /// Area in m² or piece count, depending on the category's billing unit.
    pub quantity: f64,
    pub location: Location,
    pub frequency: Frequency,
    #[serde(default)]
    pub additional_services: Vec<AdditionalService>,
    pub urgency: Urgency,
    #[serde(default)]
    pub deep_clean: bool,
    #[serde(default)]
    pub building_complexity: Option<BuildingComplexity>,
    #[serde(default)]
    pub access_difficulty: Option<AccessDifficulty>,
    #[serde(default)]
    pub security_level: Option<SecurityLevel>,
    #[serde(default)]
    pub elevator_access: Option<bool>,
    #[serde(default)]
    pub parking_available: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownCategory {
    Base,
    Discount,
    Surcharge,
    Additional,
}

/// One itemized adjustment contributing to an estimate. Amounts are signed
/// and already rounded to 2 decimal places. Line order is semantically
/// meaningful and fixed by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdownLine {
    pub label: String,
    pub amount: f64,
    pub category: BreakdownCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub base_price: f64,
    pub total_price: f64,
    pub breakdown: Vec<PriceBreakdownLine>,
    pub price_per_unit: f64,
    pub unit_label: String,
    pub is_recurring_monthly: bool,
    /// Set when the base price was converted to a monthly equivalent.
    pub occurrences_per_month: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub address: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub vat_id: Option<String>,
}

/// Display summary of what is being quoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDetails {
    pub category: ServiceCategory,
    pub quantity: f64,
    pub unit_label: String,
    pub frequency: Frequency,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteItem {
    pub description: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
            QuoteStatus::Expired => "expired",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QuoteStatus::Accepted | QuoteStatus::Rejected | QuoteStatus::Expired
        )
    }
}

/// Immutable quotation record. The only permitted mutation after assembly is
/// a status change through [`Quote::transition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: Uuid,
    /// Human-facing number: prefix + date + time/random suffix. Display
    /// convenience with best-effort uniqueness; `id` is the primary key.
    pub number: String,
    pub created_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub status: QuoteStatus,
    pub customer: CustomerInfo,
    pub company: CompanyInfo,
    pub service: ServiceDetails,
    pub items: Vec<QuoteItem>,
    pub subtotal: f64,
    pub vat_amount: f64,
    pub total_amount: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Quote {
    /// Apply a status transition. Allowed edges:
    /// `draft -> sent`, `sent -> accepted | rejected | expired`.
    /// Terminal states reject every exit with a reported error.
    pub fn transition(&mut self, to: QuoteStatus) -> Result<()> {
        let allowed = matches!(
            (self.status, to),
            (QuoteStatus::Draft, QuoteStatus::Sent)
                | (QuoteStatus::Sent, QuoteStatus::Accepted)
                | (QuoteStatus::Sent, QuoteStatus::Rejected)
                | (QuoteStatus::Sent, QuoteStatus::Expired)
        );

        if !allowed {
            return Err(QuoteError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }

        self.status = to;
        Ok(())
    }

    /// Computed view of the status: a draft or sent quote past its validity
    /// window reads as expired without the stored status changing.
    pub fn effective_status(&self, now: DateTime<Utc>) -> QuoteStatus {
        match self.status {
            QuoteStatus::Draft | QuoteStatus::Sent if now > self.valid_until => {
                QuoteStatus::Expired
            }
            other => other,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.effective_status(now) == QuoteStatus::Expired
    }
}

/// One cached rendered document. Owned exclusively by the document cache;
/// the quote stays authoritative and the bytes are reproducible from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedDocument {
    pub quote_id: Uuid,
    pub checksum: String,
    pub bytes: Vec<u8>,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    pub size_bytes: usize,
}

/// What the cache hands back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub from_cache: bool,
}
