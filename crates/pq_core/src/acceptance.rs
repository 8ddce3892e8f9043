//! Logistic Acceptance Model
//!
//! Maps a quoted price to the probability the client accepts it. The
//! curve is self-normalizing: prices enter as a ratio against the
//! project's own blended reference price, so one set of coefficients
//! serves every project size. Client type shifts the curve by a
//! calibrated offset. Numeric extremes clip, never error.

use serde::{Deserialize, Serialize};

use crate::calibration::AcceptanceConfig;

/// Exponent clamp before `exp`, wide enough that the clip bounds
/// dominate long before it matters.
const EXPONENT_LIMIT: f64 = 60.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientType {
    Student,
    #[default]
    Startup,
    Sme,
    Enterprise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub price: f64,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceResult {
    pub probability: f64,
    pub price_ratio: f64,
    pub verdict: Verdict,
    /// Probability sampled over the calibrated price multipliers, for
    /// charting. Ordered by ascending price.
    pub curve: Vec<CurvePoint>,
}

pub struct AcceptanceModel<'a> {
    cfg: &'a AcceptanceConfig,
}

impl<'a> AcceptanceModel<'a> {
    pub fn new(cfg: &'a AcceptanceConfig) -> Self {
        Self { cfg }
    }

    fn client_offset(&self, client: ClientType) -> f64 {
        match client {
            ClientType::Student => self.cfg.student_offset,
            ClientType::Startup => self.cfg.startup_offset,
            ClientType::Sme => self.cfg.sme_offset,
            ClientType::Enterprise => self.cfg.enterprise_offset,
        }
    }

    /// Acceptance probability at a raw price ratio, clipped to the
    /// configured bounds.
    pub fn probability_at_ratio(&self, price_ratio: f64, client: ClientType) -> f64 {
        let ratio = if price_ratio.is_finite() {
            price_ratio.max(0.0)
        } else {
            // A degenerate ratio means the price dwarfs the reference.
            f64::MAX.sqrt()
        };
        let exponent = (self.cfg.b0 + self.cfg.b1 * ratio + self.cfg.b2 * self.client_offset(client))
            .clamp(-EXPONENT_LIMIT, EXPONENT_LIMIT);
        let p = 1.0 / (1.0 + exponent.exp());
        p.clamp(self.cfg.floor, self.cfg.ceil)
    }

    /// Acceptance probability for a quoted price against a reference
    /// price (the blended price at the project's complexity).
    pub fn probability(&self, price: f64, reference_price: f64, client: ClientType) -> f64 {
        self.probability_at_ratio(price / reference_price.max(1.0), client)
    }

    fn verdict(&self, probability: f64) -> Verdict {
        if probability >= self.cfg.verdict_high {
            Verdict::High
        } else if probability >= self.cfg.verdict_medium {
            Verdict::Medium
        } else {
            Verdict::Low
        }
    }

    /// Full evaluation: point probability, verdict, and the sampled
    /// price/probability curve around the reference price.
    pub fn evaluate(
        &self,
        price: f64,
        reference_price: f64,
        client: ClientType,
    ) -> AcceptanceResult {
        let reference = reference_price.max(1.0);
        let price_ratio = price / reference;
        let probability = self.probability_at_ratio(price_ratio, client);
        let curve = self
            .cfg
            .curve_multipliers
            .iter()
            .map(|mult| CurvePoint {
                price: reference * mult,
                probability: self.probability_at_ratio(*mult, client),
            })
            .collect();
        AcceptanceResult {
            probability,
            price_ratio,
            verdict: self.verdict(probability),
            curve,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationConfig;
    use proptest::prelude::*;

    fn model(cal: &CalibrationConfig) -> AcceptanceModel<'_> {
        AcceptanceModel::new(&cal.acceptance)
    }

    #[test]
    fn test_reference_curve_shape() {
        let cal = CalibrationConfig::default();
        let m = model(&cal);
        // Fitted anchors: ~80% at the reference price, ~50% at 1.18x.
        let at_ref = m.probability_at_ratio(1.0, ClientType::Startup);
        let at_118 = m.probability_at_ratio(1.18, ClientType::Startup);
        assert!((at_ref - 0.82).abs() < 0.03, "got {at_ref}");
        assert!((at_118 - 0.50).abs() < 0.03, "got {at_118}");
    }

    #[test]
    fn test_enterprise_tolerates_higher_prices() {
        let cal = CalibrationConfig::default();
        let m = model(&cal);
        let startup = m.probability_at_ratio(1.2, ClientType::Startup);
        let enterprise = m.probability_at_ratio(1.2, ClientType::Enterprise);
        assert!(enterprise > startup);
    }

    #[test]
    fn test_extreme_prices_clip_instead_of_erroring() {
        let cal = CalibrationConfig::default();
        let m = model(&cal);
        assert_eq!(
            m.probability(f64::MAX, 1_000.0, ClientType::Startup),
            cal.acceptance.floor
        );
        assert_eq!(
            m.probability(0.0, 1_000.0, ClientType::Student),
            cal.acceptance.ceil
        );
        let p = m.probability(1_000.0, 0.0, ClientType::Startup);
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_evaluate_curve_ordered_by_price() {
        let cal = CalibrationConfig::default();
        let m = model(&cal);
        let result = m.evaluate(100_000.0, 100_000.0, ClientType::Startup);
        assert_eq!(result.curve.len(), cal.acceptance.curve_multipliers.len());
        assert!(result.curve.windows(2).all(|w| w[1].price > w[0].price));
        assert!(result
            .curve
            .windows(2)
            .all(|w| w[1].probability <= w[0].probability));
        assert_eq!(result.verdict, Verdict::High);
    }

    proptest! {
        #[test]
        fn prop_probability_bounded_and_non_increasing(
            price in 0.0f64..10_000_000.0,
            bump in 1.0f64..1_000_000.0,
        ) {
            let cal = CalibrationConfig::default();
            let m = model(&cal);
            let reference = 250_000.0;
            let p1 = m.probability(price, reference, ClientType::Sme);
            let p2 = m.probability(price + bump, reference, ClientType::Sme);
            prop_assert!((0.0..=1.0).contains(&p1));
            prop_assert!(p2 <= p1 + 1e-12);
        }
    }
}
