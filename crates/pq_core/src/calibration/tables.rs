//! Calibration reference data.
//!
//! All tunable constants live here as plain serde structs. The `Default`
//! impls carry the reference calibration (India market, 2026 survey) and
//! every component takes the tables by reference, so substituting a test
//! fixture is just constructing a different value.

use serde::{Deserialize, Serialize};

use crate::complexity::Tier;

/// One market rate band: projects whose total score falls in
/// `score_min..=score_max` are billed between `rate_min` and `rate_max`
/// per hour, interpolated by tier-local position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTier {
    pub tier: Tier,
    pub score_min: u8,
    pub score_max: u8,
    pub rate_min: f64,
    pub rate_max: f64,
}

/// One observed benchmark: a delivered project's complexity score and its
/// hardware bill. Rows must be strictly increasing in both fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkPoint {
    pub score: u8,
    pub hardware_cost: f64,
}

/// Effort model constants: `hours = base_hours + Σ dimension * weight`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoursWeights {
    pub base_hours: f64,
    pub hardware: f64,
    pub software: f64,
    pub ai_ml: f64,
    pub deployment: f64,
    pub risk_safety: f64,
}

impl Default for HoursWeights {
    fn default() -> Self {
        Self {
            base_hours: 30.0,
            hardware: 6.0,
            software: 7.0,
            ai_ml: 8.0,
            deployment: 5.0,
            risk_safety: 4.0,
        }
    }
}

impl HoursWeights {
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.hardware,
            self.software,
            self.ai_ml,
            self.deployment,
            self.risk_safety,
        ]
    }
}

/// Risk buffer derivation from project flags, as fractions (0.08 = 8%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFlagWeights {
    pub base: f64,
    pub safety_critical: f64,
    pub has_ai: f64,
    pub custom_pcb: f64,
    pub large_scale: f64,
    pub cap: f64,
}

impl Default for RiskFlagWeights {
    fn default() -> Self {
        Self {
            base: 0.08,
            safety_critical: 0.05,
            has_ai: 0.04,
            custom_pcb: 0.03,
            large_scale: 0.03,
            cap: 0.35,
        }
    }
}

/// Formula/benchmark blend weights. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    pub formula: f64,
    pub benchmark: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            formula: 0.6,
            benchmark: 0.4,
        }
    }
}

/// Per-tier price multipliers for the complexity-multiplier model and the
/// price-to-hardware ratio used to turn the interpolated hardware figure
/// into an independent benchmark price signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierFactors {
    pub normal: f64,
    pub moderate: f64,
    pub high: f64,
    pub industrial: f64,
}

impl TierFactors {
    pub fn for_tier(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Normal => self.normal,
            Tier::Moderate => self.moderate,
            Tier::High => self.high,
            Tier::Industrial => self.industrial,
        }
    }
}

/// Pricing model constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingConstants {
    /// Flat overhead added by the fixed model.
    pub fixed_overhead: f64,
    /// Share of client revenue impact billed by the value-based model.
    pub value_percentage: f64,
    /// Complexity-multiplier model factors, monotonic over tiers, in [1, 4].
    pub complexity_multipliers: TierFactors,
    /// Ratio between a full project price and its hardware bill, per tier.
    /// Derived from the benchmark survey (cheap projects are labor-heavy).
    pub price_to_hardware: TierFactors,
    /// Allowed absolute gap, in hours, between the modular breakdown sum
    /// and the active hours estimate.
    pub module_hours_tolerance: f64,
    /// Margin applied when the request does not specify one.
    pub default_margin_pct: f64,
}

impl Default for PricingConstants {
    fn default() -> Self {
        Self {
            fixed_overhead: 5_000.0,
            value_percentage: 0.10,
            complexity_multipliers: TierFactors {
                normal: 1.0,
                moderate: 1.5,
                high: 2.2,
                industrial: 3.0,
            },
            price_to_hardware: TierFactors {
                normal: 17.0,
                moderate: 8.0,
                high: 3.0,
                industrial: 2.7,
            },
            module_hours_tolerance: 1.0,
            default_margin_pct: 0.20,
        }
    }
}

/// Logistic acceptance model constants.
///
/// `p = 1 / (1 + exp(b0 + b1 * price_ratio + b2 * client_offset))`,
/// clipped to `[floor, ceil]`. Fitted offline against 15 calibration
/// anchors; with the reference values the curve passes ~80% at ratio 1.0
/// and ~50% at ratio 1.18.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceConfig {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub student_offset: f64,
    pub startup_offset: f64,
    pub sme_offset: f64,
    pub enterprise_offset: f64,
    pub floor: f64,
    pub ceil: f64,
    /// Price multipliers sampled for the acceptance curve output.
    pub curve_multipliers: Vec<f64>,
    pub verdict_high: f64,
    pub verdict_medium: f64,
}

impl Default for AcceptanceConfig {
    fn default() -> Self {
        Self {
            b0: -10.03,
            b1: 8.5,
            b2: 1.0,
            student_offset: -0.6,
            startup_offset: 0.0,
            sme_offset: -0.2,
            enterprise_offset: -0.9,
            floor: 0.05,
            ceil: 0.95,
            curve_multipliers: vec![
                0.60, 0.70, 0.75, 0.80, 0.85, 0.90, 0.95, 1.00, 1.05, 1.10, 1.15, 1.20, 1.25,
                1.30, 1.35, 1.40, 1.50,
            ],
            verdict_high: 0.70,
            verdict_medium: 0.45,
        }
    }
}

/// Monte Carlo sampling law constants. Spreads are fractions of the
/// deterministic estimate; the spread widens with the risk buffer and
/// with the project's risk dimension rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    pub default_iterations: u32,
    pub sigma_base: f64,
    pub sigma_risk_scale: f64,
    pub sigma_risk_dim_step: f64,
    pub ai_sigma_factor: f64,
    pub hours_floor_factor: f64,
    pub rate_jitter: f64,
    pub hardware_jitter: f64,
    pub rework_probability: f64,
    pub rework_pcb_bonus: f64,
    pub rework_probability_cap: f64,
    pub rework_cost_min: f64,
    pub rework_cost_max: f64,
    pub delay_sigma_base: f64,
    pub delay_sigma_risk_scale: f64,
    pub delay_cost_per_week: f64,
    pub histogram_bins: usize,
    pub overrun_threshold: f64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            default_iterations: 5_000,
            sigma_base: 0.10,
            sigma_risk_scale: 1.0,
            sigma_risk_dim_step: 0.02,
            ai_sigma_factor: 1.3,
            hours_floor_factor: 0.5,
            rate_jitter: 0.05,
            hardware_jitter: 0.15,
            rework_probability: 0.15,
            rework_pcb_bonus: 0.10,
            rework_probability_cap: 0.35,
            rework_cost_min: 0.08,
            rework_cost_max: 0.25,
            delay_sigma_base: 0.8,
            delay_sigma_risk_scale: 3.3,
            delay_cost_per_week: 5_000.0,
            histogram_bins: 20,
            overrun_threshold: 1.10,
        }
    }
}

/// Margin search grid for the profit optimizer, as fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    pub margin_min: f64,
    pub margin_max: f64,
    pub margin_step: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            margin_min: 0.05,
            margin_max: 0.40,
            margin_step: 0.01,
        }
    }
}

/// Reference rate tier table (₹/hr).
pub fn default_rate_tiers() -> Vec<RateTier> {
    vec![
        RateTier {
            tier: Tier::Normal,
            score_min: 0,
            score_max: 6,
            rate_min: 500.0,
            rate_max: 800.0,
        },
        RateTier {
            tier: Tier::Moderate,
            score_min: 7,
            score_max: 12,
            rate_min: 800.0,
            rate_max: 1_200.0,
        },
        RateTier {
            tier: Tier::High,
            score_min: 13,
            score_max: 18,
            rate_min: 1_200.0,
            rate_max: 2_000.0,
        },
        RateTier {
            tier: Tier::Industrial,
            score_min: 19,
            score_max: 25,
            rate_min: 2_000.0,
            rate_max: 2_500.0,
        },
    ]
}

/// Reference benchmark survey: ten delivered projects, hardware bill
/// midpoints (₹), strictly increasing in score and cost.
pub fn default_benchmarks() -> Vec<BenchmarkPoint> {
    vec![
        BenchmarkPoint { score: 4, hardware_cost: 1_050.0 },
        BenchmarkPoint { score: 6, hardware_cost: 2_000.0 },
        BenchmarkPoint { score: 9, hardware_cost: 4_000.0 },
        BenchmarkPoint { score: 10, hardware_cost: 5_500.0 },
        BenchmarkPoint { score: 12, hardware_cost: 11_500.0 },
        BenchmarkPoint { score: 14, hardware_cost: 22_500.0 },
        BenchmarkPoint { score: 16, hardware_cost: 185_000.0 },
        BenchmarkPoint { score: 17, hardware_cost: 300_000.0 },
        BenchmarkPoint { score: 20, hardware_cost: 450_000.0 },
        BenchmarkPoint { score: 23, hardware_cost: 750_000.0 },
    ]
}
