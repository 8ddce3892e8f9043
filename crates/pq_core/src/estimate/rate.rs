//! Hourly rate resolution against the market rate tier table.

use crate::calibration::CalibrationConfig;
use crate::error::{EngineError, Result};

use super::apply_override;

/// Resolve the billing rate for a total complexity score.
///
/// A positive `override_rate` is returned unchanged. Otherwise the rate
/// is interpolated inside the tier band containing `total`: at
/// `score_min` it equals `rate_min`, at `score_max` it equals
/// `rate_max`. A zero-width tier returns `rate_min` (clamped, not an
/// error). Continuity across tier boundaries is a property of the table,
/// not of this function.
pub fn resolve_rate(cal: &CalibrationConfig, total: u8, override_rate: f64) -> Result<f64> {
    apply_override("rate", override_rate, || interpolate_rate(cal, total))
}

fn interpolate_rate(cal: &CalibrationConfig, total: u8) -> Result<f64> {
    let row = cal.rate_tier_for(total).ok_or(EngineError::InvalidInput {
        field: "total_score",
        value: total as f64,
        expected: "a score covered by the rate tier table",
    })?;
    let width = row.score_max.saturating_sub(row.score_min);
    if width == 0 {
        return Ok(row.rate_min);
    }
    let p = ((total - row.score_min) as f64 / width as f64).clamp(0.0, 1.0);
    Ok(row.rate_min + p * (row.rate_max - row.rate_min))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::RateTier;
    use crate::complexity::Tier;
    use proptest::prelude::*;

    #[test]
    fn test_reference_fixture_score_11() {
        // Moderate band 7..=12 at 800-1200: position (11-7)/(12-7) = 0.8.
        let cal = CalibrationConfig::default();
        let rate = resolve_rate(&cal, 11, 0.0).unwrap();
        assert!((rate - 1_120.0).abs() < 1e-9);
    }

    #[test]
    fn test_tier_endpoints() {
        let cal = CalibrationConfig::default();
        assert_eq!(resolve_rate(&cal, 7, 0.0).unwrap(), 800.0);
        assert_eq!(resolve_rate(&cal, 12, 0.0).unwrap(), 1_200.0);
        assert_eq!(resolve_rate(&cal, 0, 0.0).unwrap(), 500.0);
        assert_eq!(resolve_rate(&cal, 25, 0.0).unwrap(), 2_500.0);
    }

    #[test]
    fn test_override_returned_unchanged() {
        let cal = CalibrationConfig::default();
        assert_eq!(resolve_rate(&cal, 11, 777.0).unwrap(), 777.0);
    }

    #[test]
    fn test_zero_width_tier_returns_rate_min() {
        let mut cal = CalibrationConfig::default();
        // Collapse Industrial to a single score with a dummy band after it.
        cal.rate_tiers[3] = RateTier {
            tier: Tier::Industrial,
            score_min: 19,
            score_max: 19,
            rate_min: 2_000.0,
            rate_max: 2_500.0,
        };
        assert_eq!(resolve_rate(&cal, 19, 0.0).unwrap(), 2_000.0);
    }

    #[test]
    fn test_discontinuity_at_tier_boundary_is_allowed() {
        let mut cal = CalibrationConfig::default();
        cal.rate_tiers[1].rate_min = 900.0; // Normal ends at 800, Moderate starts at 900
        cal.validate().unwrap();
        assert_eq!(resolve_rate(&cal, 6, 0.0).unwrap(), 800.0);
        assert_eq!(resolve_rate(&cal, 7, 0.0).unwrap(), 900.0);
    }

    proptest! {
        #[test]
        fn prop_rate_non_decreasing_within_tier(total in 7u8..=11) {
            let cal = CalibrationConfig::default();
            let lo = resolve_rate(&cal, total, 0.0).unwrap();
            let hi = resolve_rate(&cal, total + 1, 0.0).unwrap();
            prop_assert!(hi >= lo);
        }
    }
}
