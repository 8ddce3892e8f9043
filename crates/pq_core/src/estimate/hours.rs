//! Effort estimation from the complexity profile.

use crate::calibration::CalibrationConfig;
use crate::complexity::DimensionScores;
use crate::error::Result;

use super::apply_override;

/// Resolve the active hours value.
///
/// A positive `override_hours` becomes the active value and all
/// downstream pricing uses it; otherwise hours is the calibrated
/// weighted sum `base_hours + Σ dimension * weight`, strictly
/// increasing in every dimension.
pub fn estimate_hours(
    cal: &CalibrationConfig,
    scores: &DimensionScores,
    override_hours: f64,
) -> Result<f64> {
    apply_override("hours", override_hours, || {
        let weighted: f64 = scores
            .as_array()
            .iter()
            .zip(cal.hours.as_array())
            .map(|(dim, weight)| *dim as f64 * weight)
            .sum();
        Ok(cal.hours.base_hours + weighted)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_sum() {
        let cal = CalibrationConfig::default();
        // 30 + 3*6 + 3*7 + 2*8 + 2*5 + 1*4 = 99
        let hours = estimate_hours(&cal, &DimensionScores::new(3, 3, 2, 2, 1), 0.0).unwrap();
        assert!((hours - 99.0).abs() < 1e-9);
    }

    #[test]
    fn test_base_hours_at_zero_profile() {
        let cal = CalibrationConfig::default();
        let hours = estimate_hours(&cal, &DimensionScores::default(), 0.0).unwrap();
        assert_eq!(hours, cal.hours.base_hours);
    }

    #[test]
    fn test_strictly_increasing_per_dimension() {
        let cal = CalibrationConfig::default();
        let lo = estimate_hours(&cal, &DimensionScores::new(1, 2, 2, 2, 2), 0.0).unwrap();
        let hi = estimate_hours(&cal, &DimensionScores::new(2, 2, 2, 2, 2), 0.0).unwrap();
        assert!(hi > lo);
    }

    #[test]
    fn test_override_is_active_value() {
        let cal = CalibrationConfig::default();
        let hours = estimate_hours(&cal, &DimensionScores::new(3, 3, 2, 2, 1), 120.0).unwrap();
        assert_eq!(hours, 120.0);
    }
}
