//! Hardware cost estimation by benchmark interpolation.
//!
//! Hardware bills span four orders of magnitude across the benchmark
//! survey, so interpolation runs in log space. Scores outside the
//! surveyed range clamp to the nearest endpoint; there is no
//! extrapolation.

use crate::calibration::CalibrationConfig;
use crate::error::{EngineError, Result};

use super::apply_override;

/// Resolve the hardware cost for a total complexity score.
///
/// A positive `override_cost` is returned unchanged; otherwise the cost
/// is log-interpolated between the bracketing benchmark points. An exact
/// benchmark score returns the benchmark cost exactly.
pub fn estimate_hardware_cost(
    cal: &CalibrationConfig,
    total: u8,
    override_cost: f64,
) -> Result<f64> {
    apply_override("hardware_cost", override_cost, || interpolate(cal, total))
}

fn interpolate(cal: &CalibrationConfig, total: u8) -> Result<f64> {
    let points = &cal.benchmarks;
    if points.len() < 2 {
        return Err(EngineError::InvalidConfig(
            "benchmark table needs at least two points".into(),
        ));
    }
    for pair in points.windows(2) {
        if pair[1].score <= pair[0].score {
            return Err(EngineError::InvalidConfig(
                "benchmark points must be strictly increasing in score".into(),
            ));
        }
    }

    // Exact hit: return the surveyed cost with no interpolation error.
    if let Some(p) = points.iter().find(|p| p.score == total) {
        return Ok(p.hardware_cost);
    }

    let first = &points[0];
    let last = &points[points.len() - 1];
    if total < first.score {
        return Ok(first.hardware_cost);
    }
    if total > last.score {
        return Ok(last.hardware_cost);
    }

    let idx = points.partition_point(|p| p.score < total);
    let (lo, hi) = (&points[idx - 1], &points[idx]);
    let t = (total - lo.score) as f64 / (hi.score - lo.score) as f64;
    let log_cost = lo.hardware_cost.ln() + t * (hi.hardware_cost.ln() - lo.hardware_cost.ln());
    Ok(log_cost.exp())
}
