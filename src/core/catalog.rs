use std::collections::HashMap;

use crate::domain::model::{
    AccessDifficulty, AdditionalService, BillingUnit, BuildingComplexity, Frequency, Location,
    PricingBasis, SecurityLevel, ServiceCategory, Urgency,
};

/// Rate for one service category.
#[derive(Debug, Clone, PartialEq)]
pub struct RateCatalogEntry {
    /// EUR per billing unit (m² or piece) per visit/project.
    pub base_rate: f64,
    pub unit: BillingUnit,
    pub minimum_charge: f64,
    pub deep_clean_multiplier: f64,
    pub basis: PricingBasis,
}

/// Fractional price adjustment for a recurrence frequency. A positive
/// fraction is a discount, a negative one a surcharge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyModifier {
    pub fractional_adjustment: f64,
    /// Fixed approximation converting a per-visit price into a monthly
    /// equivalent. These constants are intentionally ad hoc (21.7, 4.33, ...)
    /// and must not be recomputed from calendar arithmetic; changing them
    /// changes customer-facing prices.
    pub occurrences_per_month: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AddonPricing {
    Flat(f64),
    /// EUR per unit of the request's quantity.
    PerUnit(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdditionalServiceOption {
    pub pricing: AddonPricing,
    pub applicable_categories: Vec<ServiceCategory>,
}

impl AdditionalServiceOption {
    pub fn applies_to(&self, category: ServiceCategory) -> bool {
        self.applicable_categories.contains(&category)
    }
}

/// Additive site-complexity percentages, combined as `1 + Σ pct` and applied
/// once by the pricing pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexityRates {
    pub multi_storey: f64,
    pub high_rise: f64,
    pub access_moderate: f64,
    pub access_difficult: f64,
    pub security_standard: f64,
    pub security_high: f64,
    pub no_elevator: f64,
    pub no_parking: f64,
}

impl ComplexityRates {
    pub fn building_pct(&self, complexity: BuildingComplexity) -> f64 {
        match complexity {
            BuildingComplexity::SingleStorey => 0.0,
            BuildingComplexity::MultiStorey => self.multi_storey,
            BuildingComplexity::HighRise => self.high_rise,
        }
    }

    pub fn access_pct(&self, difficulty: AccessDifficulty) -> f64 {
        match difficulty {
            AccessDifficulty::Easy => 0.0,
            AccessDifficulty::Moderate => self.access_moderate,
            AccessDifficulty::Difficult => self.access_difficult,
        }
    }

    pub fn security_pct(&self, level: SecurityLevel) -> f64 {
        match level {
            SecurityLevel::Unrestricted => 0.0,
            SecurityLevel::Standard => self.security_standard,
            SecurityLevel::High => self.security_high,
        }
    }
}

/// Immutable pricing data, constructed once and injected into the engine.
/// Tests build alternate catalogs through the public fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RateCatalog {
    pub entries: HashMap<ServiceCategory, RateCatalogEntry>,
    pub frequencies: HashMap<Frequency, FrequencyModifier>,
    pub locations: HashMap<Location, f64>,
    pub additional_services: HashMap<AdditionalService, AdditionalServiceOption>,
    pub urgencies: HashMap<Urgency, f64>,
    pub complexity: ComplexityRates,
    /// Requests above this quantity are routed to manual consultation.
    pub max_quantity: f64,
}

impl RateCatalog {
    pub fn entry(&self, category: ServiceCategory) -> Option<&RateCatalogEntry> {
        self.entries.get(&category)
    }

    pub fn frequency(&self, frequency: Frequency) -> Option<&FrequencyModifier> {
        self.frequencies.get(&frequency)
    }

    pub fn location_multiplier(&self, location: Location) -> Option<f64> {
        self.locations.get(&location).copied()
    }

    pub fn additional_service(
        &self,
        addon: AdditionalService,
    ) -> Option<&AdditionalServiceOption> {
        self.additional_services.get(&addon)
    }

    pub fn urgency_multiplier(&self, urgency: Urgency) -> Option<f64> {
        self.urgencies.get(&urgency).copied()
    }
}

impl Default for RateCatalog {
    fn default() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            ServiceCategory::OfficeCleaning,
            RateCatalogEntry {
                base_rate: 1.50,
                unit: BillingUnit::SquareMeters,
                minimum_charge: 150.0,
                deep_clean_multiplier: 1.5,
                basis: PricingBasis::PerVisit,
            },
        );
        entries.insert(
            ServiceCategory::WindowCleaning,
            RateCatalogEntry {
                base_rate: 3.50,
                unit: BillingUnit::Pieces,
                minimum_charge: 80.0,
                deep_clean_multiplier: 1.4,
                basis: PricingBasis::PerVisit,
            },
        );
        entries.insert(
            ServiceCategory::StairwellCleaning,
            RateCatalogEntry {
                base_rate: 0.85,
                unit: BillingUnit::SquareMeters,
                minimum_charge: 120.0,
                deep_clean_multiplier: 1.4,
                basis: PricingBasis::PerVisit,
            },
        );
        entries.insert(
            ServiceCategory::CarpetCleaning,
            RateCatalogEntry {
                base_rate: 4.50,
                unit: BillingUnit::SquareMeters,
                minimum_charge: 100.0,
                deep_clean_multiplier: 1.6,
                basis: PricingBasis::PerVisit,
            },
        );
        entries.insert(
            ServiceCategory::FacadeCleaning,
            RateCatalogEntry {
                base_rate: 5.00,
                unit: BillingUnit::SquareMeters,
                minimum_charge: 250.0,
                deep_clean_multiplier: 1.3,
                basis: PricingBasis::PerProject,
            },
        );
        entries.insert(
            ServiceCategory::ConstructionCleaning,
            RateCatalogEntry {
                base_rate: 3.20,
                unit: BillingUnit::SquareMeters,
                minimum_charge: 200.0,
                deep_clean_multiplier: 1.3,
                basis: PricingBasis::PerProject,
            },
        );

        let mut frequencies = HashMap::new();
        frequencies.insert(
            Frequency::OneTime,
            FrequencyModifier {
                fractional_adjustment: -0.10,
                occurrences_per_month: 1.0,
            },
        );
        frequencies.insert(
            Frequency::Monthly,
            FrequencyModifier {
                fractional_adjustment: 0.0,
                occurrences_per_month: 1.0,
            },
        );
        frequencies.insert(
            Frequency::BiWeekly,
            FrequencyModifier {
                fractional_adjustment: 0.05,
                occurrences_per_month: 2.17,
            },
        );
        frequencies.insert(
            Frequency::Weekly,
            FrequencyModifier {
                fractional_adjustment: 0.10,
                occurrences_per_month: 4.33,
            },
        );
        frequencies.insert(
            Frequency::Daily,
            FrequencyModifier {
                fractional_adjustment: 0.15,
                occurrences_per_month: 21.7,
            },
        );

        let mut locations = HashMap::new();
        locations.insert(Location::Munich, 1.15);
        locations.insert(Location::Frankfurt, 1.10);
        locations.insert(Location::Hamburg, 1.08);
        locations.insert(Location::Berlin, 1.05);
        locations.insert(Location::Cologne, 1.03);
        locations.insert(Location::Other, 1.00);

        let mut additional_services = HashMap::new();
        additional_services.insert(
            AdditionalService::WindowsInterior,
            AdditionalServiceOption {
                pricing: AddonPricing::Flat(60.0),
                applicable_categories: vec![
                    ServiceCategory::OfficeCleaning,
                    ServiceCategory::StairwellCleaning,
                ],
            },
        );
        additional_services.insert(
            AdditionalService::Disinfection,
            AdditionalServiceOption {
                pricing: AddonPricing::PerUnit(0.45),
                applicable_categories: vec![
                    ServiceCategory::OfficeCleaning,
                    ServiceCategory::StairwellCleaning,
                    ServiceCategory::ConstructionCleaning,
                ],
            },
        );
        additional_services.insert(
            AdditionalService::TrashRemoval,
            AdditionalServiceOption {
                pricing: AddonPricing::Flat(45.0),
                applicable_categories: vec![
                    ServiceCategory::OfficeCleaning,
                    ServiceCategory::ConstructionCleaning,
                ],
            },
        );
        additional_services.insert(
            AdditionalService::UpholsteryCleaning,
            AdditionalServiceOption {
                pricing: AddonPricing::Flat(90.0),
                applicable_categories: vec![
                    ServiceCategory::OfficeCleaning,
                    ServiceCategory::CarpetCleaning,
                ],
            },
        );

        let mut urgencies = HashMap::new();
        urgencies.insert(Urgency::Standard, 1.0);
        urgencies.insert(Urgency::Express, 1.25);
        urgencies.insert(Urgency::SameDay, 1.50);

        Self {
            entries,
            frequencies,
            locations,
            additional_services,
            urgencies,
            complexity: ComplexityRates {
                multi_storey: 0.05,
                high_rise: 0.10,
                access_moderate: 0.03,
                access_difficult: 0.07,
                security_standard: 0.02,
                security_high: 0.05,
                no_elevator: 0.04,
                no_parking: 0.02,
            },
            max_quantity: 10_000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_covers_every_enum_variant() {
        let catalog = RateCatalog::default();

        for category in ServiceCategory::ALL {
            assert!(catalog.entry(category).is_some(), "{:?}", category);
        }
        for frequency in [
            Frequency::OneTime,
            Frequency::Monthly,
            Frequency::BiWeekly,
            Frequency::Weekly,
            Frequency::Daily,
        ] {
            assert!(catalog.frequency(frequency).is_some(), "{:?}", frequency);
        }
        for addon in AdditionalService::ALL {
            assert!(catalog.additional_service(addon).is_some(), "{:?}", addon);
        }
        assert_eq!(catalog.location_multiplier(Location::Hamburg), Some(1.08));
        assert_eq!(catalog.urgency_multiplier(Urgency::Standard), Some(1.0));
    }

    #[test]
    fn occurrences_per_month_constants_are_preserved() {
        let catalog = RateCatalog::default();
        assert_eq!(
            catalog.frequency(Frequency::Daily).unwrap().occurrences_per_month,
            21.7
        );
        assert_eq!(
            catalog.frequency(Frequency::Weekly).unwrap().occurrences_per_month,
            4.33
        );
        assert_eq!(
            catalog.frequency(Frequency::OneTime).unwrap().occurrences_per_month,
            1.0
        );
    }

    #[test]
    fn addon_applicability() {
        let catalog = RateCatalog::default();
        let upholstery = catalog
            .additional_service(AdditionalService::UpholsteryCleaning)
            .unwrap();
        assert!(upholstery.applies_to(ServiceCategory::CarpetCleaning));
        assert!(!upholstery.applies_to(ServiceCategory::FacadeCleaning));
    }
}
