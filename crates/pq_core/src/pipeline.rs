//! Full Analysis Pipeline
//!
//! Orchestrates scoring, estimation, pricing, acceptance, optimization,
//! and risk simulation into one `AnalyticsResult`. The pipeline holds
//! only the read-only calibration tables; every invocation is
//! independent, so concurrent calls need no locking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::acceptance::{AcceptanceModel, AcceptanceResult, ClientType};
use crate::calibration::{BenchmarkPoint, CalibrationConfig};
use crate::complexity::{score_complexity, ComplexityProfile, DimensionScores};
use crate::error::{EngineError, Result};
use crate::estimate::{
    derive_risk_buffer, estimate_hardware_cost, estimate_hours, resolve_rate, RiskAssessment,
    RiskFlags,
};
use crate::monte_carlo::{MonteCarloSimulator, RiskDistribution, SimulationInputs};
use crate::optimizer::{MarginRange, OptimizationResult, ProfitOptimizer};
use crate::pricing::{
    blend_price, price_all, BlendedPrice, CostInputs, ModelPrice, PricingModelKind,
};

/// One analysis request. Overrides follow the shared rule: zero or
/// absent means auto-estimate, positive replaces the estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub scores: DimensionScores,
    #[serde(default)]
    pub rate_override: f64,
    #[serde(default)]
    pub hardware_cost_override: f64,
    #[serde(default)]
    pub hours_override: f64,
    #[serde(default)]
    pub risk_buffer_override: f64,
    #[serde(default)]
    pub material_cost: f64,
    #[serde(default)]
    pub margin_pct: Option<f64>,
    #[serde(default)]
    pub client_type: ClientType,
    #[serde(default)]
    pub risk_flags: RiskFlags,
    /// Required only for the value-based model.
    #[serde(default)]
    pub client_revenue_impact: Option<f64>,
    /// Required only for the modular model.
    #[serde(default)]
    pub module_hours: Option<BTreeMap<String, f64>>,
    /// Price to evaluate for acceptance; defaults to the blended price.
    #[serde(default)]
    pub quoted_price: Option<f64>,
    #[serde(default)]
    pub iterations: Option<u32>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub margin_range: Option<MarginRange>,
}

impl AnalysisRequest {
    pub fn new(scores: DimensionScores) -> Self {
        Self {
            scores,
            rate_override: 0.0,
            hardware_cost_override: 0.0,
            hours_override: 0.0,
            risk_buffer_override: 0.0,
            material_cost: 0.0,
            margin_pct: None,
            client_type: ClientType::default(),
            risk_flags: RiskFlags::default(),
            client_revenue_impact: None,
            module_hours: None,
            quoted_price: None,
            iterations: None,
            seed: None,
            margin_range: None,
        }
    }
}

/// The composite result: created fresh per invocation, never mutated
/// afterwards. Persistence and rendering are the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    pub complexity: ComplexityProfile,
    pub cost_inputs: CostInputs,
    pub risk_assessment: RiskAssessment,
    pub model_prices: BTreeMap<PricingModelKind, ModelPrice>,
    pub blended: BlendedPrice,
    pub acceptance: AcceptanceResult,
    pub optimization: OptimizationResult,
    pub risk_distribution: RiskDistribution,
    /// The three surveyed benchmarks closest in score, as market context.
    pub similar_benchmarks: Vec<BenchmarkPoint>,
}

pub struct AnalyticsPipeline {
    cal: CalibrationConfig,
}

impl AnalyticsPipeline {
    /// Build a pipeline over a validated calibration.
    pub fn new(cal: CalibrationConfig) -> Result<Self> {
        cal.validate()?;
        Ok(Self { cal })
    }

    /// Pipeline over the built-in reference calibration.
    pub fn with_reference_calibration() -> Self {
        Self {
            cal: CalibrationConfig::default(),
        }
    }

    pub fn calibration(&self) -> &CalibrationConfig {
        &self.cal
    }

    /// Narrow entry point: complexity only.
    pub fn score(&self, scores: DimensionScores) -> Result<ComplexityProfile> {
        score_complexity(scores)
    }

    /// Narrow entry point: Monte Carlo only.
    pub fn simulate_risk(
        &self,
        inputs: &SimulationInputs,
        iterations: Option<u32>,
        seed: Option<u64>,
    ) -> Result<RiskDistribution> {
        let iterations = iterations.unwrap_or(self.cal.monte_carlo.default_iterations);
        MonteCarloSimulator::new(&self.cal.monte_carlo).simulate(inputs, iterations, seed)
    }

    /// Narrow entry point: acceptance only, against an explicit
    /// reference price.
    pub fn acceptance(
        &self,
        price: f64,
        reference_price: f64,
        client: ClientType,
    ) -> AcceptanceResult {
        AcceptanceModel::new(&self.cal.acceptance).evaluate(price, reference_price, client)
    }

    fn margin_pct(&self, request: &AnalysisRequest) -> Result<f64> {
        let margin = request
            .margin_pct
            .unwrap_or(self.cal.pricing.default_margin_pct);
        if margin < 0.0 || !margin.is_finite() {
            return Err(EngineError::InvalidInput {
                field: "margin_pct",
                value: margin,
                expected: "a non-negative finite margin fraction",
            });
        }
        Ok(margin)
    }

    /// Resolve the cost inputs for a request: estimators for anything
    /// not overridden, validation for everything.
    pub fn resolve_cost_inputs(
        &self,
        request: &AnalysisRequest,
        profile: &ComplexityProfile,
    ) -> Result<(CostInputs, RiskAssessment)> {
        if request.material_cost < 0.0 || !request.material_cost.is_finite() {
            return Err(EngineError::InvalidInput {
                field: "material_cost",
                value: request.material_cost,
                expected: "a non-negative finite material cost",
            });
        }
        let rate = resolve_rate(&self.cal, profile.total, request.rate_override)?;
        let hardware_cost =
            estimate_hardware_cost(&self.cal, profile.total, request.hardware_cost_override)?;
        let hours = estimate_hours(&self.cal, &profile.scores, request.hours_override)?;
        let risk =
            derive_risk_buffer(&self.cal, &request.risk_flags, request.risk_buffer_override)?;
        let inputs = CostInputs {
            rate,
            hours,
            hardware_cost,
            material_cost: request.material_cost,
            risk_buffer_pct: risk.risk_buffer_pct,
            margin_pct: self.margin_pct(request)?,
        };
        Ok((inputs, risk))
    }

    /// Full analysis: every stage, one composite result.
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalyticsResult> {
        let profile = score_complexity(request.scores)?;
        debug!(total = profile.total, tier = profile.tier.label(), "scored complexity");

        let (cost_inputs, risk_assessment) = self.resolve_cost_inputs(request, &profile)?;

        let model_prices = price_all(
            &cost_inputs,
            profile.tier,
            &self.cal.pricing,
            request.client_revenue_impact,
            request.module_hours.as_ref(),
        )?;

        // The benchmark signal always uses the market's interpolated
        // figure, even when the caller overrode their own hardware bill.
        let interpolated_hw = estimate_hardware_cost(&self.cal, profile.total, 0.0)?;
        let formula_price = model_prices
            .get(&PricingModelKind::Hourly)
            .map(|m| m.price)
            .unwrap_or(0.0);
        let blended = blend_price(&self.cal, profile.tier, formula_price, interpolated_hw);

        let quoted = request.quoted_price.unwrap_or(blended.blended);
        let acceptance = AcceptanceModel::new(&self.cal.acceptance).evaluate(
            quoted,
            blended.blended,
            request.client_type,
        );

        let optimization = ProfitOptimizer::new(&self.cal).optimize(
            PricingModelKind::Hourly,
            &cost_inputs,
            profile.tier,
            blended.blended,
            request.client_type,
            request.margin_range,
        )?;

        let sim_inputs = SimulationInputs {
            hours: cost_inputs.hours,
            rate: cost_inputs.rate,
            hardware_cost: cost_inputs.hardware_cost,
            risk_buffer_pct: cost_inputs.risk_buffer_pct,
            risk_score: profile.scores.risk_safety,
            has_ai: request.risk_flags.has_ai,
            custom_pcb: request.risk_flags.custom_pcb,
        };
        let risk_distribution =
            self.simulate_risk(&sim_inputs, request.iterations, request.seed)?;

        Ok(AnalyticsResult {
            complexity: profile,
            cost_inputs,
            risk_assessment,
            model_prices,
            blended,
            acceptance,
            optimization,
            risk_distribution,
            similar_benchmarks: self.nearest_benchmarks(profile.total, 3),
        })
    }

    /// The `n` surveyed benchmarks closest in score; ties prefer the
    /// lower score.
    pub fn nearest_benchmarks(&self, total: u8, n: usize) -> Vec<BenchmarkPoint> {
        let mut ranked: Vec<BenchmarkPoint> = self.cal.benchmarks.clone();
        ranked.sort_by_key(|b| {
            let distance = (b.score as i16 - total as i16).abs();
            (distance, b.score)
        });
        ranked.truncate(n);
        ranked
    }
}
