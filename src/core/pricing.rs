use tracing::debug;

use crate::core::catalog::{
    AddonPricing, FrequencyModifier, RateCatalog, RateCatalogEntry,
};
use crate::domain::model::{
    round2, AdditionalService, BreakdownCategory, BuildingComplexity, CalculatorInput,
    PriceBreakdownLine, PriceEstimate, PricingBasis,
};
use crate::utils::error::{FieldError, QuoteError, Result};
use crate::utils::validation;

/// Deltas below this are treated as noise from a neutral multiplier and not
/// emitted as breakdown lines (half a cent, covers floating-point slop).
const LINE_EPSILON: f64 = 0.005;

/// Everything a pipeline stage is allowed to see.
struct StageContext<'a> {
    input: &'a CalculatorInput,
    catalog: &'a RateCatalog,
    entry: &'a RateCatalogEntry,
    frequency: &'a FrequencyModifier,
}

/// A pure pipeline stage: `(current price, context) -> (new price, lines)`.
/// The stage list is fixed and non-reorderable.
type Stage = fn(&StageContext<'_>, f64) -> (f64, Vec<PriceBreakdownLine>);

const STAGES: [Stage; 5] = [
    frequency_stage,
    location_stage,
    additional_services_stage,
    urgency_stage,
    complexity_stage,
];

/// Line amounts are deltas between rounded cumulative prices, so the
/// breakdown always telescopes to the rounded total.
fn rounded_delta(before: f64, after: f64) -> f64 {
    round2(round2(after) - round2(before))
}

pub struct PricingEngine {
    catalog: RateCatalog,
}

impl PricingEngine {
    pub fn new(catalog: RateCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &RateCatalog {
        &self.catalog
    }

    /// Derive a priced breakdown for a calculator request.
    ///
    /// Validation runs first and short-circuits the calculation; every
    /// problem is collected so the caller can render all of them at once.
    /// For identical input and catalog the result is identical down to
    /// breakdown ordering and values.
    pub fn estimate(&self, input: &CalculatorInput) -> Result<PriceEstimate> {
        let (entry, frequency) = self.validate(input)?;

        let ctx = StageContext {
            input,
            catalog: &self.catalog,
            entry,
            frequency,
        };

        let (base, base_line, monthly) = base_stage(&ctx);
        debug!(
            category = input.service_category.label(),
            base, monthly, "base price computed"
        );

        let mut current = base;
        let mut breakdown = vec![base_line];
        for stage in STAGES {
            let (next, lines) = stage(&ctx, current);
            current = next;
            breakdown.extend(lines);
        }

        let total_price = round2(current);
        let estimate = PriceEstimate {
            base_price: round2(base),
            total_price,
            breakdown,
            price_per_unit: round2(total_price / input.quantity),
            unit_label: entry.unit.label().to_string(),
            is_recurring_monthly: monthly,
            occurrences_per_month: monthly.then_some(frequency.occurrences_per_month),
        };
        debug!(total = estimate.total_price, lines = estimate.breakdown.len(), "estimate ready");
        Ok(estimate)
    }

    /// Collects every problem before failing and, on success, hands back the
    /// catalog entries the pipeline needs so later lookups cannot fail.
    fn validate<'a>(
        &'a self,
        input: &CalculatorInput,
    ) -> Result<(&'a RateCatalogEntry, &'a FrequencyModifier)> {
        let mut errors: Vec<FieldError> = Vec::new();

        let entry = self.catalog.entry(input.service_category);
        if entry.is_none() {
            errors.push(FieldError::new(
                "service_category",
                format!(
                    "no rate configured for '{}'",
                    input.service_category.label()
                ),
            ));
        }
        validation::check_positive("quantity", input.quantity, &mut errors);
        validation::check_max("quantity", input.quantity, self.catalog.max_quantity, &mut errors);
        let frequency = self.catalog.frequency(input.frequency);
        if frequency.is_none() {
            errors.push(FieldError::new(
                "frequency",
                format!("unknown frequency '{}'", input.frequency.label()),
            ));
        }
        if self.catalog.location_multiplier(input.location).is_none() {
            errors.push(FieldError::new(
                "location",
                format!("unknown location '{}'", input.location.label()),
            ));
        }
        if self.catalog.urgency_multiplier(input.urgency).is_none() {
            errors.push(FieldError::new(
                "urgency",
                format!("unknown urgency '{}'", input.urgency.label()),
            ));
        }

        match (entry, frequency) {
            (Some(entry), Some(frequency)) if errors.is_empty() => Ok((entry, frequency)),
            _ => Err(QuoteError::Validation(errors)),
        }
    }
}

/// Stage 1: quantity x rate (x deep-clean), floored at the minimum charge.
/// Per-visit categories billed on a recurring frequency are converted to a
/// monthly equivalent exactly once, before any adjustment stage.
fn base_stage(ctx: &StageContext<'_>) -> (f64, PriceBreakdownLine, bool) {
    let input = ctx.input;
    let entry = ctx.entry;

    let mut raw = input.quantity * entry.base_rate;
    if input.deep_clean {
        raw *= entry.deep_clean_multiplier;
    }
    let per_visit = raw.max(entry.minimum_charge);

    let convert = entry.basis == PricingBasis::PerVisit && input.frequency.is_recurring();
    let base = if convert {
        per_visit * ctx.frequency.occurrences_per_month
    } else {
        per_visit
    };

    let mut label = format!(
        "{} ({} {})",
        input.service_category.label(),
        input.quantity,
        entry.unit.label()
    );
    if input.deep_clean {
        label.push_str(", deep clean");
    }
    if convert {
        label.push_str(", per month");
    }

    let line = PriceBreakdownLine {
        label,
        amount: round2(base),
        category: BreakdownCategory::Base,
    };
    (base, line, convert)
}

/// Stage 2: fractional frequency adjustment. Positive fraction = discount,
/// negative = surcharge; zero emits nothing.
fn frequency_stage(ctx: &StageContext<'_>, price: f64) -> (f64, Vec<PriceBreakdownLine>) {
    let adj = ctx.frequency.fractional_adjustment;
    if adj == 0.0 {
        return (price, Vec::new());
    }

    let new = price * (1.0 - adj);
    let (label, category) = if adj > 0.0 {
        (
            format!(
                "{} discount ({:.0}%)",
                capitalize(ctx.input.frequency.label()),
                adj * 100.0
            ),
            BreakdownCategory::Discount,
        )
    } else {
        (
            format!(
                "{} surcharge ({:.0}%)",
                capitalize(ctx.input.frequency.label()),
                -adj * 100.0
            ),
            BreakdownCategory::Surcharge,
        )
    };

    let line = PriceBreakdownLine {
        label,
        amount: rounded_delta(price, new),
        category,
    };
    (new, vec![line])
}

/// Stage 3: location multiplier; a line is emitted only when the delta is
/// above the epsilon, so a neutral region adds no noise.
fn location_stage(ctx: &StageContext<'_>, price: f64) -> (f64, Vec<PriceBreakdownLine>) {
    // Validated upfront; a missing entry degrades to neutral.
    let multiplier = ctx
        .catalog
        .location_multiplier(ctx.input.location)
        .unwrap_or(1.0);
    let new = price * multiplier;
    let delta = new - price;

    if delta.abs() <= LINE_EPSILON {
        return (new, Vec::new());
    }

    let category = if delta > 0.0 {
        BreakdownCategory::Surcharge
    } else {
        BreakdownCategory::Discount
    };
    let line = PriceBreakdownLine {
        label: format!("Location adjustment ({})", ctx.input.location.label()),
        amount: rounded_delta(price, new),
        category,
    };
    (new, vec![line])
}

/// Stage 4: selected, applicable add-ons. Iterated in the fixed enum order
/// so the emitted lines never depend on the order of the input set.
fn additional_services_stage(
    ctx: &StageContext<'_>,
    price: f64,
) -> (f64, Vec<PriceBreakdownLine>) {
    let mut current = price;
    let mut lines = Vec::new();

    for addon in AdditionalService::ALL {
        if !ctx.input.additional_services.contains(&addon) {
            continue;
        }
        let Some(option) = ctx.catalog.additional_service(addon) else {
            continue;
        };
        if !option.applies_to(ctx.input.service_category) {
            debug!(addon = addon.label(), "add-on not applicable, skipped");
            continue;
        }

        let amount = match option.pricing {
            AddonPricing::Flat(price) => price,
            AddonPricing::PerUnit(rate) => rate * ctx.input.quantity,
        };
        current += amount;
        lines.push(PriceBreakdownLine {
            label: addon.label().to_string(),
            amount: round2(amount),
            category: BreakdownCategory::Additional,
        });
    }

    (current, lines)
}

/// Stage 5: urgency multiplier; surcharge line only when above 1.
fn urgency_stage(ctx: &StageContext<'_>, price: f64) -> (f64, Vec<PriceBreakdownLine>) {
    let multiplier = ctx
        .catalog
        .urgency_multiplier(ctx.input.urgency)
        .unwrap_or(1.0);
    if multiplier <= 1.0 {
        return (price, Vec::new());
    }

    let new = price * multiplier;
    let line = PriceBreakdownLine {
        label: format!("Urgency surcharge ({})", ctx.input.urgency.label()),
        amount: rounded_delta(price, new),
        category: BreakdownCategory::Surcharge,
    };
    (new, vec![line])
}

/// Stage 6: site-complexity surcharges. Independent additive percentages,
/// applied once as `1 + sum`, emitted as a single aggregated line.
fn complexity_stage(ctx: &StageContext<'_>, price: f64) -> (f64, Vec<PriceBreakdownLine>) {
    let rates = &ctx.catalog.complexity;
    let input = ctx.input;
    let mut pct = 0.0;

    if let Some(building) = input.building_complexity {
        pct += rates.building_pct(building);
        // A missing elevator only matters above the ground floor.
        let storeyed = matches!(
            building,
            BuildingComplexity::MultiStorey | BuildingComplexity::HighRise
        );
        if storeyed && input.elevator_access == Some(false) {
            pct += rates.no_elevator;
        }
    }
    if let Some(difficulty) = input.access_difficulty {
        pct += rates.access_pct(difficulty);
    }
    if let Some(level) = input.security_level {
        pct += rates.security_pct(level);
    }
    if input.parking_available == Some(false) {
        pct += rates.no_parking;
    }

    if pct == 0.0 {
        return (price, Vec::new());
    }

    let new = price * (1.0 + pct);
    let line = PriceBreakdownLine {
        label: format!("Site complexity surcharge ({:.0}%)", pct * 100.0),
        amount: rounded_delta(price, new),
        category: BreakdownCategory::Surcharge,
    };
    (new, vec![line])
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
