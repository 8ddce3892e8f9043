//! Calibration Configuration
//!
//! The engine is driven entirely by an immutable `CalibrationConfig`
//! passed to each component at construction. Nothing here is mutated
//! after load; the pipeline shares the tables read-only across
//! invocations.

pub mod tables;

use serde::{Deserialize, Serialize};

pub use tables::{
    default_benchmarks, default_rate_tiers, AcceptanceConfig, BenchmarkPoint, BlendWeights,
    HoursWeights, MonteCarloConfig, OptimizerConfig, PricingConstants, RateTier, RiskFlagWeights,
    TierFactors,
};

use crate::complexity::{Tier, TOTAL_MAX};
use crate::error::{EngineError, Result};

/// Complete calibration for the pricing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    pub rate_tiers: Vec<RateTier>,
    pub benchmarks: Vec<BenchmarkPoint>,
    #[serde(default)]
    pub hours: HoursWeights,
    #[serde(default)]
    pub risk_flags: RiskFlagWeights,
    #[serde(default)]
    pub blend: BlendWeights,
    #[serde(default)]
    pub pricing: PricingConstants,
    #[serde(default)]
    pub acceptance: AcceptanceConfig,
    #[serde(default)]
    pub monte_carlo: MonteCarloConfig,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            rate_tiers: default_rate_tiers(),
            benchmarks: default_benchmarks(),
            hours: HoursWeights::default(),
            risk_flags: RiskFlagWeights::default(),
            blend: BlendWeights::default(),
            pricing: PricingConstants::default(),
            acceptance: AcceptanceConfig::default(),
            monte_carlo: MonteCarloConfig::default(),
            optimizer: OptimizerConfig::default(),
        }
    }
}

fn config_err(msg: impl Into<String>) -> EngineError {
    EngineError::InvalidConfig(msg.into())
}

impl CalibrationConfig {
    /// Fail-fast table validation. Run once at pipeline construction so
    /// the computation path can assume well-formed tables.
    pub fn validate(&self) -> Result<()> {
        self.validate_rate_tiers()?;
        self.validate_benchmarks()?;
        self.validate_hours()?;
        self.validate_blend()?;
        self.validate_pricing()?;
        self.validate_acceptance()?;
        self.validate_monte_carlo()?;
        self.validate_optimizer()?;
        Ok(())
    }

    /// Rate tier row containing `total`, if any.
    pub fn rate_tier_for(&self, total: u8) -> Option<&RateTier> {
        self.rate_tiers
            .iter()
            .find(|t| t.score_min <= total && total <= t.score_max)
    }

    fn validate_rate_tiers(&self) -> Result<()> {
        if self.rate_tiers.is_empty() {
            return Err(config_err("rate tier table is empty"));
        }
        let first = &self.rate_tiers[0];
        if first.score_min != 0 {
            return Err(config_err("rate tiers must start at score 0"));
        }
        for row in &self.rate_tiers {
            if row.score_min > row.score_max {
                return Err(config_err(format!(
                    "rate tier {} has score_min > score_max",
                    row.tier.label()
                )));
            }
            if row.rate_min <= 0.0 || row.rate_max < row.rate_min {
                return Err(config_err(format!(
                    "rate tier {} has an invalid rate band",
                    row.tier.label()
                )));
            }
            if Tier::from_total(row.score_min) != row.tier
                || Tier::from_total(row.score_max) != row.tier
            {
                return Err(config_err(format!(
                    "rate tier {} does not match the tier band boundaries",
                    row.tier.label()
                )));
            }
        }
        for pair in self.rate_tiers.windows(2) {
            if pair[1].score_min != pair[0].score_max + 1 {
                return Err(config_err("rate tiers must be contiguous with no gaps"));
            }
        }
        let last = self.rate_tiers.last().map(|t| t.score_max).unwrap_or(0);
        if last != TOTAL_MAX {
            return Err(config_err("rate tiers must cover the full 0..=25 range"));
        }
        Ok(())
    }

    fn validate_benchmarks(&self) -> Result<()> {
        if self.benchmarks.len() < 2 {
            return Err(config_err("benchmark table needs at least two points"));
        }
        for point in &self.benchmarks {
            if point.hardware_cost <= 0.0 {
                return Err(config_err(format!(
                    "benchmark at score {} has a non-positive hardware cost",
                    point.score
                )));
            }
        }
        for pair in self.benchmarks.windows(2) {
            if pair[1].score <= pair[0].score || pair[1].hardware_cost <= pair[0].hardware_cost {
                return Err(config_err(
                    "benchmark points must be strictly increasing in score and cost",
                ));
            }
        }
        Ok(())
    }

    fn validate_hours(&self) -> Result<()> {
        if self.hours.base_hours < 0.0 {
            return Err(config_err("base_hours must be non-negative"));
        }
        if self.hours.as_array().iter().any(|w| *w <= 0.0) {
            return Err(config_err("hour weights must be positive"));
        }
        Ok(())
    }

    fn validate_blend(&self) -> Result<()> {
        let w = &self.blend;
        if w.formula < 0.0 || w.benchmark < 0.0 || (w.formula + w.benchmark - 1.0).abs() > 1e-9 {
            return Err(config_err("blend weights must be non-negative and sum to 1"));
        }
        Ok(())
    }

    fn validate_pricing(&self) -> Result<()> {
        let p = &self.pricing;
        if p.fixed_overhead < 0.0 {
            return Err(config_err("fixed_overhead must be non-negative"));
        }
        if p.value_percentage <= 0.0 || p.value_percentage > 1.0 {
            return Err(config_err("value_percentage must be in (0, 1]"));
        }
        let m = &p.complexity_multipliers;
        let seq = [m.normal, m.moderate, m.high, m.industrial];
        if seq.iter().any(|f| *f < 1.0 || *f > 4.0) {
            return Err(config_err("complexity multipliers must be in [1, 4]"));
        }
        if seq.windows(2).any(|w| w[1] < w[0]) {
            return Err(config_err("complexity multipliers must be monotonic over tiers"));
        }
        if p.module_hours_tolerance <= 0.0 {
            return Err(config_err("module_hours_tolerance must be positive"));
        }
        if p.default_margin_pct < 0.0 {
            return Err(config_err("default_margin_pct must be non-negative"));
        }
        Ok(())
    }

    fn validate_acceptance(&self) -> Result<()> {
        let a = &self.acceptance;
        if a.b1 < 0.0 {
            return Err(config_err(
                "acceptance b1 must be non-negative (curve must not rise with price)",
            ));
        }
        if !(0.0..=1.0).contains(&a.floor) || !(0.0..=1.0).contains(&a.ceil) || a.floor > a.ceil {
            return Err(config_err("acceptance clip bounds must satisfy 0 <= floor <= ceil <= 1"));
        }
        if a.curve_multipliers.is_empty() {
            return Err(config_err("acceptance curve multipliers must not be empty"));
        }
        if a.curve_multipliers.windows(2).any(|w| w[1] <= w[0]) {
            return Err(config_err("acceptance curve multipliers must be strictly increasing"));
        }
        Ok(())
    }

    fn validate_monte_carlo(&self) -> Result<()> {
        let mc = &self.monte_carlo;
        if mc.default_iterations == 0 {
            return Err(config_err("default_iterations must be positive"));
        }
        if mc.sigma_base <= 0.0 {
            return Err(config_err("sigma_base must be positive"));
        }
        for (name, jitter) in [
            ("rate_jitter", mc.rate_jitter),
            ("hardware_jitter", mc.hardware_jitter),
        ] {
            if !(0.0..1.0).contains(&jitter) {
                return Err(config_err(format!("{name} must be in [0, 1)")));
            }
        }
        if mc.rework_cost_min > mc.rework_cost_max {
            return Err(config_err("rework cost range is inverted"));
        }
        for (name, p) in [
            ("rework_probability", mc.rework_probability),
            ("rework_probability_cap", mc.rework_probability_cap),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(config_err(format!("{name} must be a probability")));
            }
        }
        if mc.histogram_bins == 0 {
            return Err(config_err("histogram_bins must be positive"));
        }
        if mc.hours_floor_factor < 0.0 || mc.hours_floor_factor > 1.0 {
            return Err(config_err("hours_floor_factor must be in [0, 1]"));
        }
        Ok(())
    }

    fn validate_optimizer(&self) -> Result<()> {
        let o = &self.optimizer;
        if o.margin_min < 0.0 || o.margin_max < o.margin_min {
            return Err(config_err("optimizer margin range is invalid"));
        }
        if o.margin_step <= 0.0 {
            return Err(config_err("optimizer margin_step must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_calibration_is_valid() {
        CalibrationConfig::default().validate().unwrap();
    }

    #[test]
    fn test_rate_tier_lookup() {
        let cal = CalibrationConfig::default();
        assert_eq!(cal.rate_tier_for(11).unwrap().tier, Tier::Moderate);
        assert_eq!(cal.rate_tier_for(0).unwrap().tier, Tier::Normal);
        assert_eq!(cal.rate_tier_for(25).unwrap().tier, Tier::Industrial);
    }

    #[test]
    fn test_gapped_rate_tiers_rejected() {
        let mut cal = CalibrationConfig::default();
        cal.rate_tiers[1].score_min = 8;
        assert!(cal.validate().is_err());
    }

    #[test]
    fn test_misordered_benchmarks_rejected() {
        let mut cal = CalibrationConfig::default();
        cal.benchmarks[3].hardware_cost = 1.0;
        assert!(cal.validate().is_err());
    }

    #[test]
    fn test_empty_benchmarks_rejected() {
        let mut cal = CalibrationConfig::default();
        cal.benchmarks.clear();
        assert!(cal.validate().is_err());
    }

    #[test]
    fn test_rising_acceptance_slope_rejected() {
        let mut cal = CalibrationConfig::default();
        cal.acceptance.b1 = -1.0;
        assert!(cal.validate().is_err());
    }
}
