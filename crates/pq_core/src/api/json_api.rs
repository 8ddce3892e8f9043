//! JSON string entry points.
//!
//! Each function deserializes a request, runs the corresponding engine
//! entry point against the supplied (or reference) calibration, and
//! serializes the result. Errors surface as `EngineError`, never as a
//! partially-built response.

use serde::Deserialize;

use crate::acceptance::ClientType;
use crate::calibration::CalibrationConfig;
use crate::complexity::DimensionScores;
use crate::error::Result;
use crate::monte_carlo::SimulationInputs;
use crate::optimizer::MarginRange;
use crate::pipeline::{AnalysisRequest, AnalyticsPipeline};
use crate::pricing::{CostInputs, PricingModelKind};

#[derive(Debug, Deserialize)]
struct AnalyzeEnvelope {
    #[serde(flatten)]
    request: AnalysisRequest,
    #[serde(default)]
    calibration: Option<CalibrationConfig>,
}

fn pipeline_for(calibration: Option<CalibrationConfig>) -> Result<AnalyticsPipeline> {
    match calibration {
        Some(cal) => AnalyticsPipeline::new(cal),
        None => Ok(AnalyticsPipeline::with_reference_calibration()),
    }
}

/// Full analysis: request JSON in, `AnalyticsResult` JSON out.
pub fn analyze_project_json(request_json: &str) -> Result<String> {
    let envelope: AnalyzeEnvelope = serde_json::from_str(request_json)?;
    let pipeline = pipeline_for(envelope.calibration)?;
    let result = pipeline.analyze(&envelope.request)?;
    Ok(serde_json::to_string(&result)?)
}

/// Complexity scoring only.
pub fn score_complexity_json(request_json: &str) -> Result<String> {
    let scores: DimensionScores = serde_json::from_str(request_json)?;
    let pipeline = AnalyticsPipeline::with_reference_calibration();
    let profile = pipeline.score(scores)?;
    Ok(serde_json::to_string(&profile)?)
}

#[derive(Debug, Deserialize)]
struct MonteCarloRequest {
    #[serde(flatten)]
    inputs: SimulationInputs,
    #[serde(default)]
    iterations: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    calibration: Option<CalibrationConfig>,
}

/// Monte Carlo simulation only.
pub fn monte_carlo_json(request_json: &str) -> Result<String> {
    let req: MonteCarloRequest = serde_json::from_str(request_json)?;
    let pipeline = pipeline_for(req.calibration)?;
    let distribution = pipeline.simulate_risk(&req.inputs, req.iterations, req.seed)?;
    Ok(serde_json::to_string(&distribution)?)
}

#[derive(Debug, Deserialize)]
struct AcceptanceRequest {
    price: f64,
    reference_price: f64,
    #[serde(default)]
    client_type: ClientType,
    #[serde(default)]
    calibration: Option<CalibrationConfig>,
}

/// Acceptance curve only, against an explicit reference price.
pub fn acceptance_json(request_json: &str) -> Result<String> {
    let req: AcceptanceRequest = serde_json::from_str(request_json)?;
    let pipeline = pipeline_for(req.calibration)?;
    let result = pipeline.acceptance(req.price, req.reference_price, req.client_type);
    Ok(serde_json::to_string(&result)?)
}

#[derive(Debug, Deserialize)]
struct OptimizeRequest {
    cost_inputs: CostInputs,
    total_score: u8,
    reference_price: f64,
    #[serde(default)]
    client_type: ClientType,
    #[serde(default)]
    margin_range: Option<MarginRange>,
    #[serde(default)]
    calibration: Option<CalibrationConfig>,
}

/// Margin optimization only.
pub fn optimize_margin_json(request_json: &str) -> Result<String> {
    let req: OptimizeRequest = serde_json::from_str(request_json)?;
    let pipeline = pipeline_for(req.calibration)?;
    let tier = crate::complexity::Tier::from_total(req.total_score);
    let result = crate::optimizer::ProfitOptimizer::new(pipeline.calibration()).optimize(
        PricingModelKind::Hourly,
        &req.cost_inputs,
        tier,
        req.reference_price,
        req.client_type,
        req.margin_range,
    )?;
    Ok(serde_json::to_string(&result)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_round_trip() {
        let request = r#"{
            "scores": {"hardware": 3, "software": 3, "ai_ml": 2, "deployment": 2, "risk_safety": 1},
            "client_type": "startup",
            "iterations": 500,
            "seed": 42
        }"#;
        let json = analyze_project_json(request).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["complexity"]["total"], 11);
        assert_eq!(value["complexity"]["tier"], "moderate");
        assert!((value["cost_inputs"]["rate"].as_f64().unwrap() - 1_120.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_complexity_json() {
        let json = score_complexity_json(
            r#"{"hardware": 1, "software": 1, "ai_ml": 0, "deployment": 1, "risk_safety": 1}"#,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total"], 4);
        assert_eq!(value["tier"], "normal");
    }

    #[test]
    fn test_monte_carlo_json_seeded() {
        let request = r#"{
            "hours": 100.0, "rate": 1000.0, "hardware_cost": 20000.0,
            "risk_buffer_pct": 0.1, "risk_score": 2,
            "iterations": 500, "seed": 7
        }"#;
        let a = monte_carlo_json(request).unwrap();
        let b = monte_carlo_json(request).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_malformed_request_is_a_typed_error() {
        assert!(analyze_project_json("{not json").is_err());
    }

    #[test]
    fn test_negative_iteration_count_is_a_typed_error() {
        let request = r#"{
            "hours": 100.0, "rate": 1000.0, "hardware_cost": 20000.0,
            "risk_buffer_pct": 0.1, "risk_score": 2,
            "iterations": -5, "seed": 7
        }"#;
        assert!(matches!(
            monte_carlo_json(request),
            Err(crate::error::EngineError::Deserialization(_))
        ));
    }

    #[test]
    fn test_acceptance_json() {
        let json = acceptance_json(
            r#"{"price": 120000.0, "reference_price": 120000.0, "client_type": "enterprise"}"#,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let p = value["probability"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&p));
    }
}
