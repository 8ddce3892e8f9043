//! Estimators for the three overridable cost inputs (rate, hardware
//! cost, hours) plus the risk buffer derivation.
//!
//! Every estimator follows the same resolution rule: a positive user
//! override replaces the estimate, zero means "auto", negative values
//! are rejected. The estimators themselves are pure functions of the
//! complexity profile and the calibration tables.

pub mod hardware;
pub mod hours;
pub mod rate;
pub mod risk;

pub use hardware::estimate_hardware_cost;
pub use hours::estimate_hours;
pub use rate::resolve_rate;
pub use risk::{derive_risk_buffer, RiskAssessment, RiskFlags};

use crate::error::{EngineError, Result};

/// Shared override rule: positive replaces, zero delegates, negative fails.
pub(crate) fn apply_override(
    field: &'static str,
    override_value: f64,
    auto: impl FnOnce() -> Result<f64>,
) -> Result<f64> {
    if override_value < 0.0 || !override_value.is_finite() {
        return Err(EngineError::InvalidInput {
            field,
            value: override_value,
            expected: "a non-negative finite override (0 = auto-estimate)",
        });
    }
    if override_value > 0.0 {
        Ok(override_value)
    } else {
        auto()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_override_wins() {
        let v = apply_override("rate", 950.0, || Ok(100.0)).unwrap();
        assert_eq!(v, 950.0);
    }

    #[test]
    fn test_zero_delegates_to_estimator() {
        let v = apply_override("rate", 0.0, || Ok(100.0)).unwrap();
        assert_eq!(v, 100.0);
    }

    #[test]
    fn test_negative_override_rejected() {
        assert!(apply_override("rate", -1.0, || Ok(100.0)).is_err());
        assert!(apply_override("rate", f64::NAN, || Ok(100.0)).is_err());
    }
}
