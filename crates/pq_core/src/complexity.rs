//! Structured Complexity Scoring
//!
//! Five project dimensions rated 0-5 each, summed to a 0-25 total and
//! mapped to one of four tiers. Tier bands are closed, contiguous
//! intervals and must stay in sync with the rate tier table
//! (enforced by `CalibrationConfig::validate`).

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Maximum rating per dimension.
pub const DIMENSION_MAX: u8 = 5;

/// Maximum total complexity score (five dimensions at 5 each).
pub const TOTAL_MAX: u8 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Normal,
    Moderate,
    High,
    Industrial,
}

impl Tier {
    /// Closed tier band boundaries over the total score.
    pub fn from_total(total: u8) -> Tier {
        match total {
            0..=6 => Tier::Normal,
            7..=12 => Tier::Moderate,
            13..=18 => Tier::High,
            _ => Tier::Industrial,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Normal => "Normal",
            Tier::Moderate => "Moderate",
            Tier::High => "High",
            Tier::Industrial => "Industrial",
        }
    }
}

/// Per-dimension project ratings, each in 0..=5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub hardware: u8,
    pub software: u8,
    pub ai_ml: u8,
    pub deployment: u8,
    pub risk_safety: u8,
}

impl DimensionScores {
    pub fn new(hardware: u8, software: u8, ai_ml: u8, deployment: u8, risk_safety: u8) -> Self {
        Self {
            hardware,
            software,
            ai_ml,
            deployment,
            risk_safety,
        }
    }

    /// Ratings in declaration order (hardware, software, ai_ml, deployment, risk_safety).
    pub fn as_array(&self) -> [u8; 5] {
        [
            self.hardware,
            self.software,
            self.ai_ml,
            self.deployment,
            self.risk_safety,
        ]
    }
}

/// Scored complexity: the validated ratings plus derived total and tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityProfile {
    pub scores: DimensionScores,
    pub total: u8,
    pub tier: Tier,
}

const DIMENSION_FIELDS: [&str; 5] = ["hardware", "software", "ai_ml", "deployment", "risk_safety"];

/// Validate dimension ratings and derive total score and tier.
pub fn score_complexity(scores: DimensionScores) -> Result<ComplexityProfile> {
    for (field, value) in DIMENSION_FIELDS.iter().copied().zip(scores.as_array()) {
        if value > DIMENSION_MAX {
            return Err(EngineError::InvalidInput {
                field,
                value: value as f64,
                expected: "a dimension rating in 0..=5",
            });
        }
    }
    let total = scores.as_array().iter().sum();
    Ok(ComplexityProfile {
        scores,
        total,
        tier: Tier::from_total(total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Tier::from_total(0), Tier::Normal);
        assert_eq!(Tier::from_total(6), Tier::Normal);
        assert_eq!(Tier::from_total(7), Tier::Moderate);
        assert_eq!(Tier::from_total(12), Tier::Moderate);
        assert_eq!(Tier::from_total(13), Tier::High);
        assert_eq!(Tier::from_total(18), Tier::High);
        assert_eq!(Tier::from_total(19), Tier::Industrial);
        assert_eq!(Tier::from_total(25), Tier::Industrial);
    }

    #[test]
    fn test_score_complexity_total() {
        let profile = score_complexity(DimensionScores::new(3, 3, 2, 2, 1)).unwrap();
        assert_eq!(profile.total, 11);
        assert_eq!(profile.tier, Tier::Moderate);
    }

    #[test]
    fn test_out_of_range_dimension_rejected() {
        let err = score_complexity(DimensionScores::new(6, 0, 0, 0, 0)).unwrap_err();
        match err {
            crate::error::EngineError::InvalidInput { field, .. } => {
                assert_eq!(field, "hardware")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    proptest! {
        #[test]
        fn prop_total_in_range(hw in 0u8..=5, sw in 0u8..=5, ai in 0u8..=5, dep in 0u8..=5, rs in 0u8..=5) {
            let profile = score_complexity(DimensionScores::new(hw, sw, ai, dep, rs)).unwrap();
            prop_assert!(profile.total <= TOTAL_MAX);
            prop_assert_eq!(profile.tier, Tier::from_total(profile.total));
        }
    }
}
