//! Formula/benchmark price blending.
//!
//! The benchmark survey contributes an independent price signal: the
//! interpolated hardware figure scaled by the tier's price-to-hardware
//! ratio. Blending keeps formula output anchored to observed market
//! prices.

use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationConfig;
use crate::complexity::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendedPrice {
    pub formula_price: f64,
    pub benchmark_price: f64,
    pub blended: f64,
}

/// Blend the hourly-model price with the benchmark-derived price using
/// the calibrated weights.
pub fn blend_price(
    cal: &CalibrationConfig,
    tier: Tier,
    formula_price: f64,
    interpolated_hardware_cost: f64,
) -> BlendedPrice {
    let benchmark_price =
        interpolated_hardware_cost * cal.pricing.price_to_hardware.for_tier(tier);
    let blended = cal.blend.formula * formula_price + cal.blend.benchmark * benchmark_price;
    BlendedPrice {
        formula_price,
        benchmark_price,
        blended,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_weights_fixture() {
        let cal = CalibrationConfig::default();
        // Moderate tier: benchmark price = 10_000 * 8.0 = 80_000.
        let b = blend_price(&cal, Tier::Moderate, 120_000.0, 10_000.0);
        assert!((b.benchmark_price - 80_000.0).abs() < 1e-9);
        assert!((b.blended - (0.6 * 120_000.0 + 0.4 * 80_000.0)).abs() < 1e-9);
        assert!((b.blended - 104_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_blend_respects_recalibrated_weights() {
        let mut cal = CalibrationConfig::default();
        cal.blend.formula = 0.8;
        cal.blend.benchmark = 0.2;
        let b = blend_price(&cal, Tier::Moderate, 100_000.0, 10_000.0);
        assert!((b.blended - (0.8 * 100_000.0 + 0.2 * 80_000.0)).abs() < 1e-9);
    }
}
