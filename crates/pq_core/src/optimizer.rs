//! Profit Margin Optimization
//!
//! Sweeps the calibrated margin grid, prices each candidate margin
//! through a margin-parametric pricing model, weighs it by the
//! acceptance probability, and picks the margin with the highest
//! expected revenue. Ties resolve to the lowest margin: when two
//! margins earn the same, the cheaper quote is the safer one.

use serde::{Deserialize, Serialize};

use crate::acceptance::{AcceptanceModel, ClientType};
use crate::calibration::CalibrationConfig;
use crate::complexity::Tier;
use crate::error::{EngineError, Result};
use crate::pricing::{price_complexity_multiplier, price_fixed, price_hourly, CostInputs, PricingModelKind};

/// Override for the calibrated margin search grid, as fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginPoint {
    pub margin: f64,
    pub price: f64,
    pub expected_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub optimal_margin: f64,
    pub optimal_price: f64,
    pub expected_revenue: f64,
    /// Full sampled curve, ordered by ascending margin. Required output;
    /// it feeds the margin/revenue chart.
    pub curve: Vec<MarginPoint>,
}

/// Hard cap on sampled grid points. A caller-supplied range that needs
/// more samples than this is a request error, not a bigger allocation.
const MAX_GRID_POINTS: usize = 100_000;

pub struct ProfitOptimizer<'a> {
    cal: &'a CalibrationConfig,
}

impl<'a> ProfitOptimizer<'a> {
    pub fn new(cal: &'a CalibrationConfig) -> Self {
        Self { cal }
    }

    fn price_at_margin(
        &self,
        kind: PricingModelKind,
        inputs: &CostInputs,
        tier: Tier,
        margin: f64,
    ) -> Result<f64> {
        let candidate = CostInputs {
            margin_pct: margin,
            ..*inputs
        };
        match kind {
            PricingModelKind::Hourly => Ok(price_hourly(&candidate).price),
            PricingModelKind::Fixed => Ok(price_fixed(&candidate, &self.cal.pricing).price),
            PricingModelKind::ComplexityMultiplier => {
                Ok(price_complexity_multiplier(&candidate, tier, &self.cal.pricing).price)
            }
            PricingModelKind::ValueBased | PricingModelKind::Modular => {
                Err(EngineError::InvalidInput {
                    field: "pricing_model",
                    value: 0.0,
                    expected: "a margin-parametric model (hourly, fixed, complexity_multiplier)",
                })
            }
        }
    }

    /// Sweep the margin grid and maximize `price * P(accept)`.
    pub fn optimize(
        &self,
        kind: PricingModelKind,
        inputs: &CostInputs,
        tier: Tier,
        reference_price: f64,
        client: ClientType,
        range: Option<MarginRange>,
    ) -> Result<OptimizationResult> {
        let (min, max, step) = match range {
            Some(r) => (r.min, r.max, r.step),
            None => (
                self.cal.optimizer.margin_min,
                self.cal.optimizer.margin_max,
                self.cal.optimizer.margin_step,
            ),
        };
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max < min {
            return Err(EngineError::InvalidInput {
                field: "margin_range",
                value: if !min.is_finite() || min < 0.0 { min } else { max },
                expected: "finite margins with 0 <= margin_min <= margin_max",
            });
        }
        if step <= 0.0 || !step.is_finite() {
            return Err(EngineError::InvalidInput {
                field: "margin_step",
                value: step,
                expected: "a positive finite step",
            });
        }

        let acceptance = AcceptanceModel::new(&self.cal.acceptance);
        let steps = ((max - min) / step).round() as usize;
        if steps >= MAX_GRID_POINTS {
            return Err(EngineError::InvalidInput {
                field: "margin_range",
                value: max,
                expected: "a margin grid of at most 100000 points",
            });
        }
        let mut curve = Vec::with_capacity(steps + 1);
        let mut best: Option<MarginPoint> = None;

        for i in 0..=steps {
            let margin = (min + i as f64 * step).min(max);
            let price = self.price_at_margin(kind, inputs, tier, margin)?;
            let probability = acceptance.probability(price, reference_price, client);
            let point = MarginPoint {
                margin,
                price,
                expected_revenue: price * probability,
            };
            // Strict comparison keeps the lowest margin among ties.
            if best.map_or(true, |b| point.expected_revenue > b.expected_revenue) {
                best = Some(point);
            }
            curve.push(point);
        }

        // The grid always contains at least `min` itself.
        let best = best.ok_or(EngineError::InvalidInput {
            field: "margin_range",
            value: min,
            expected: "a non-empty margin grid",
        })?;
        Ok(OptimizationResult {
            optimal_margin: best.margin,
            optimal_price: best.price,
            expected_revenue: best.expected_revenue,
            curve,
        })
    }
}
