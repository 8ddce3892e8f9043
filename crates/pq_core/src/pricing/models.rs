//! The five pricing models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calibration::PricingConstants;
use crate::complexity::Tier;
use crate::error::{EngineError, Result};

/// Shared cost structure every pricing model consumes. Built once per
/// request from the resolved estimates and overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostInputs {
    pub rate: f64,
    pub hours: f64,
    pub hardware_cost: f64,
    pub material_cost: f64,
    /// Risk buffer as a fraction (0.08 = 8%).
    pub risk_buffer_pct: f64,
    /// Profit margin as a fraction (0.20 = 20%).
    pub margin_pct: f64,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PricingModelKind {
    Hourly,
    Fixed,
    ComplexityMultiplier,
    ValueBased,
    Modular,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownLine {
    pub label: String,
    pub amount: f64,
}

fn line(label: impl Into<String>, amount: f64) -> BreakdownLine {
    BreakdownLine {
        label: label.into(),
        amount,
    }
}

/// One model's output: the price and how it was composed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrice {
    pub kind: PricingModelKind,
    pub price: f64,
    pub breakdown: Vec<BreakdownLine>,
}

/// Labor-driven price: `rate * hours * (1 + risk) * (1 + margin)`.
pub fn price_hourly(inputs: &CostInputs) -> ModelPrice {
    let labor = inputs.rate * inputs.hours;
    let with_risk = labor * (1.0 + inputs.risk_buffer_pct);
    let price = with_risk * (1.0 + inputs.margin_pct);
    ModelPrice {
        kind: PricingModelKind::Hourly,
        price,
        breakdown: vec![
            line("labor", labor),
            line("risk_buffer", with_risk - labor),
            line("margin", price - with_risk),
        ],
    }
}

/// Bill-of-materials price, independent of hours and rate.
pub fn price_fixed(inputs: &CostInputs, constants: &PricingConstants) -> ModelPrice {
    let price = inputs.hardware_cost + inputs.material_cost + constants.fixed_overhead;
    ModelPrice {
        kind: PricingModelKind::Fixed,
        price,
        breakdown: vec![
            line("hardware", inputs.hardware_cost),
            line("materials", inputs.material_cost),
            line("fixed_overhead", constants.fixed_overhead),
        ],
    }
}

/// Labor base scaled by the tier's complexity multiplier.
pub fn price_complexity_multiplier(
    inputs: &CostInputs,
    tier: Tier,
    constants: &PricingConstants,
) -> ModelPrice {
    let base_cost = inputs.rate * inputs.hours;
    let multiplier = constants.complexity_multipliers.for_tier(tier);
    ModelPrice {
        kind: PricingModelKind::ComplexityMultiplier,
        price: base_cost * multiplier,
        breakdown: vec![line("base_cost", base_cost), line("multiplier", multiplier)],
    }
}

/// Share of the client's expected revenue impact.
pub fn price_value_based(
    client_revenue_impact: f64,
    constants: &PricingConstants,
) -> Result<ModelPrice> {
    if client_revenue_impact < 0.0 || !client_revenue_impact.is_finite() {
        return Err(EngineError::InvalidInput {
            field: "client_revenue_impact",
            value: client_revenue_impact,
            expected: "a non-negative finite revenue impact",
        });
    }
    let price = client_revenue_impact * constants.value_percentage;
    Ok(ModelPrice {
        kind: PricingModelKind::ValueBased,
        price,
        breakdown: vec![
            line("client_revenue_impact", client_revenue_impact),
            line("value_percentage", constants.value_percentage),
        ],
    })
}

/// Per-module labor pricing. The declared module hours must agree with
/// the active hours estimate within the configured tolerance; a larger
/// gap is an inconsistency, never silently rescaled.
pub fn price_modular(
    inputs: &CostInputs,
    modules: &BTreeMap<String, f64>,
    constants: &PricingConstants,
) -> Result<ModelPrice> {
    for hours in modules.values() {
        if *hours < 0.0 || !hours.is_finite() {
            return Err(EngineError::InvalidInput {
                field: "module_hours",
                value: *hours,
                expected: "non-negative finite hours per module",
            });
        }
    }
    let declared: f64 = modules.values().sum();
    if (declared - inputs.hours).abs() > constants.module_hours_tolerance {
        return Err(EngineError::InconsistentModuleHours {
            declared,
            expected: inputs.hours,
            tolerance: constants.module_hours_tolerance,
        });
    }
    let mut breakdown = Vec::with_capacity(modules.len());
    let mut price = 0.0;
    for (name, hours) in modules {
        let cost = hours * inputs.rate;
        breakdown.push(line(name.clone(), cost));
        price += cost;
    }
    Ok(ModelPrice {
        kind: PricingModelKind::Modular,
        price,
        breakdown,
    })
}

/// Compute every applicable model for one request. The three
/// estimate-driven models always run; value-based and modular run when
/// their caller-supplied inputs are present.
pub fn price_all(
    inputs: &CostInputs,
    tier: Tier,
    constants: &PricingConstants,
    client_revenue_impact: Option<f64>,
    module_hours: Option<&BTreeMap<String, f64>>,
) -> Result<BTreeMap<PricingModelKind, ModelPrice>> {
    let mut prices = BTreeMap::new();
    prices.insert(PricingModelKind::Hourly, price_hourly(inputs));
    prices.insert(PricingModelKind::Fixed, price_fixed(inputs, constants));
    prices.insert(
        PricingModelKind::ComplexityMultiplier,
        price_complexity_multiplier(inputs, tier, constants),
    );
    if let Some(revenue) = client_revenue_impact {
        prices.insert(
            PricingModelKind::ValueBased,
            price_value_based(revenue, constants)?,
        );
    }
    if let Some(modules) = module_hours {
        prices.insert(
            PricingModelKind::Modular,
            price_modular(inputs, modules, constants)?,
        );
    }
    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> CostInputs {
        CostInputs {
            rate: 1_000.0,
            hours: 100.0,
            hardware_cost: 20_000.0,
            material_cost: 3_000.0,
            risk_buffer_pct: 0.10,
            margin_pct: 0.20,
        }
    }

    #[test]
    fn test_hourly_formula() {
        let p = price_hourly(&inputs());
        // 1000 * 100 * 1.10 * 1.20
        assert!((p.price - 132_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_fixed_formula_ignores_labor() {
        let constants = PricingConstants::default();
        let mut i = inputs();
        i.rate = 0.0;
        i.hours = 0.0;
        let p = price_fixed(&i, &constants);
        assert!((p.price - 28_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_complexity_multiplier_monotonic_over_tiers() {
        let constants = PricingConstants::default();
        let i = inputs();
        let tiers = [Tier::Normal, Tier::Moderate, Tier::High, Tier::Industrial];
        let prices: Vec<f64> = tiers
            .iter()
            .map(|t| price_complexity_multiplier(&i, *t, &constants).price)
            .collect();
        assert!(prices.windows(2).all(|w| w[1] >= w[0]));
        assert!((prices[0] - 100_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_value_based_formula() {
        let constants = PricingConstants::default();
        let p = price_value_based(2_000_000.0, &constants).unwrap();
        assert!((p.price - 200_000.0).abs() < 1e-9);
        assert!(price_value_based(-1.0, &constants).is_err());
    }

    #[test]
    fn test_modular_sums_modules() {
        let constants = PricingConstants::default();
        let modules: BTreeMap<String, f64> = [
            ("research".to_string(), 10.0),
            ("development".to_string(), 60.0),
            ("testing".to_string(), 30.0),
        ]
        .into_iter()
        .collect();
        let p = price_modular(&inputs(), &modules, &constants).unwrap();
        assert!((p.price - 100_000.0).abs() < 1e-9);
        assert_eq!(p.breakdown.len(), 3);
    }

    #[test]
    fn test_modular_hour_mismatch_rejected() {
        let constants = PricingConstants::default();
        let modules: BTreeMap<String, f64> =
            [("development".to_string(), 80.0)].into_iter().collect();
        let err = price_modular(&inputs(), &modules, &constants).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InconsistentModuleHours { .. }
        ));
    }

    #[test]
    fn test_price_all_skips_optional_models_without_inputs() {
        let constants = PricingConstants::default();
        let prices = price_all(&inputs(), Tier::Moderate, &constants, None, None).unwrap();
        assert_eq!(prices.len(), 3);
        assert!(prices.contains_key(&PricingModelKind::Hourly));
        assert!(!prices.contains_key(&PricingModelKind::ValueBased));
    }
}
