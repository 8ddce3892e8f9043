//! # pq_core - Project Pricing Intelligence Engine
//!
//! Estimates and prices engineering projects from a structured
//! complexity profile: calibrated rate/hardware/hours estimation,
//! five pricing models, logistic acceptance modeling, profit-margin
//! optimization, and seed-reproducible Monte Carlo risk simulation.
//!
//! ## Features
//! - Pure computation: no I/O, no shared mutable state, safe to call
//!   concurrently
//! - 100% deterministic with a seed (same seed = same result)
//! - Calibration supplied as an immutable configuration object;
//!   substitute fixtures freely in tests

pub mod acceptance;
pub mod api;
pub mod calibration;
pub mod complexity;
pub mod error;
pub mod estimate;
pub mod monte_carlo;
pub mod optimizer;
pub mod pipeline;
pub mod pricing;

// Re-export the main entry points
pub use api::{
    acceptance_json, analyze_project_json, monte_carlo_json, optimize_margin_json,
    score_complexity_json,
};
pub use error::{EngineError, Result};
pub use pipeline::{AnalysisRequest, AnalyticsPipeline, AnalyticsResult};

// Re-export the component types
pub use acceptance::{AcceptanceModel, AcceptanceResult, ClientType, Verdict};
pub use calibration::CalibrationConfig;
pub use complexity::{score_complexity, ComplexityProfile, DimensionScores, Tier};
pub use estimate::{RiskAssessment, RiskFlags};
pub use monte_carlo::{MonteCarloSimulator, RiskDistribution, SimulationInputs};
pub use optimizer::{MarginRange, OptimizationResult, ProfitOptimizer};
pub use pricing::{BlendedPrice, CostInputs, ModelPrice, PricingModelKind};
