//! Monte Carlo Risk Simulation
//!
//! Samples cost variance around the deterministic estimate: hours from
//! a normal whose spread widens with the risk buffer and the risk
//! dimension rating, rate and hardware from bounded uniform jitters,
//! plus rework and delay events. Iterations are independent; each draws from
//! its own counter-derived ChaCha8 stream, so the same seed reproduces
//! the same aggregate statistics even under rayon scheduling.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calibration::MonteCarloConfig;
use crate::error::{EngineError, Result};

/// Inputs the simulator perturbs. `risk_score` is the project's risk
/// dimension rating (0-5), which widens the sampling spread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationInputs {
    pub hours: f64,
    pub rate: f64,
    pub hardware_cost: f64,
    pub risk_buffer_pct: f64,
    pub risk_score: u8,
    #[serde(default)]
    pub has_ai: bool,
    #[serde(default)]
    pub custom_pcb: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin centers, ascending.
    pub bins: Vec<f64>,
    pub frequencies: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub percentile_5: f64,
    pub percentile_50: f64,
    pub percentile_95: f64,
    pub mean: f64,
    pub stdev: f64,
    pub histogram: Histogram,
    /// Share of simulated costs above `overrun_threshold` times the
    /// deterministic `hours * rate + hardware` estimate.
    pub overrun_probability: f64,
    pub iterations: u32,
    /// Seed the run actually used; echoing it back makes an unseeded
    /// run reproducible after the fact.
    pub seed: u64,
}

pub struct MonteCarloSimulator<'a> {
    cfg: &'a MonteCarloConfig,
}

/// Per-iteration stream derivation: splitmix-style mixing keeps streams
/// decorrelated for adjacent indices.
fn iteration_seed(seed: u64, index: u64) -> u64 {
    let mut z = seed ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl<'a> MonteCarloSimulator<'a> {
    pub fn new(cfg: &'a MonteCarloConfig) -> Self {
        Self { cfg }
    }

    /// Run `iterations` simulations. `seed == None` draws a fresh seed
    /// from the thread RNG; the chosen seed is echoed in the result.
    pub fn simulate(
        &self,
        inputs: &SimulationInputs,
        iterations: u32,
        seed: Option<u64>,
    ) -> Result<RiskDistribution> {
        if iterations == 0 {
            return Err(EngineError::InvalidInput {
                field: "iterations",
                value: 0.0,
                expected: "a positive iteration count",
            });
        }
        for (field, value) in [
            ("hours", inputs.hours),
            ("rate", inputs.rate),
            ("hardware_cost", inputs.hardware_cost),
            ("risk_buffer_pct", inputs.risk_buffer_pct),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(EngineError::InvalidInput {
                    field,
                    value,
                    expected: "a non-negative finite simulation input",
                });
            }
        }

        let cfg = self.cfg;
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        debug!(iterations, seed, "running monte carlo simulation");

        let mut sigma_fraction = cfg.sigma_base
            + cfg.sigma_risk_scale * inputs.risk_buffer_pct
            + cfg.sigma_risk_dim_step * inputs.risk_score as f64;
        if inputs.has_ai {
            sigma_fraction *= cfg.ai_sigma_factor;
        }
        let hours_sigma = inputs.hours * sigma_fraction;
        let hours_dist = if hours_sigma > 0.0 {
            Some(Normal::new(inputs.hours, hours_sigma).map_err(|e| {
                EngineError::InvalidConfig(format!("hours distribution: {e}"))
            })?)
        } else {
            None
        };

        let delay_sigma =
            cfg.delay_sigma_base + cfg.delay_sigma_risk_scale * inputs.risk_buffer_pct;
        let delay_dist = if delay_sigma > 0.0 {
            Some(Normal::new(0.0, delay_sigma).map_err(|e| {
                EngineError::InvalidConfig(format!("delay distribution: {e}"))
            })?)
        } else {
            None
        };

        let rework_probability = if inputs.custom_pcb {
            (cfg.rework_probability + cfg.rework_pcb_bonus).min(cfg.rework_probability_cap)
        } else {
            cfg.rework_probability
        };

        let mut costs: Vec<f64> = (0..iterations as u64)
            .into_par_iter()
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(iteration_seed(seed, i));
                simulate_one(
                    cfg,
                    inputs,
                    hours_dist,
                    delay_dist,
                    rework_probability,
                    &mut rng,
                )
            })
            .collect();
        costs.sort_by(f64::total_cmp);

        let n = costs.len();
        let mean = costs.iter().sum::<f64>() / n as f64;
        let variance = costs.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n as f64;
        let baseline = inputs.hours * inputs.rate + inputs.hardware_cost;
        let overrun = costs
            .iter()
            .filter(|c| **c > baseline * cfg.overrun_threshold)
            .count();

        Ok(RiskDistribution {
            percentile_5: percentile(&costs, 0.05),
            percentile_50: percentile(&costs, 0.50),
            percentile_95: percentile(&costs, 0.95),
            mean,
            stdev: variance.sqrt(),
            histogram: build_histogram(&costs, cfg.histogram_bins),
            overrun_probability: overrun as f64 / n as f64,
            iterations,
            seed,
        })
    }
}

fn simulate_one(
    cfg: &MonteCarloConfig,
    inputs: &SimulationInputs,
    hours_dist: Option<Normal<f64>>,
    delay_dist: Option<Normal<f64>>,
    rework_probability: f64,
    rng: &mut impl Rng,
) -> f64 {
    let sim_hours = match hours_dist {
        Some(dist) => dist
            .sample(rng)
            .max(inputs.hours * cfg.hours_floor_factor),
        None => inputs.hours,
    };
    let sim_rate = if cfg.rate_jitter > 0.0 {
        inputs.rate * rng.gen_range(1.0 - cfg.rate_jitter..=1.0 + cfg.rate_jitter)
    } else {
        inputs.rate
    };
    let sim_hardware = if cfg.hardware_jitter > 0.0 {
        inputs.hardware_cost
            * rng.gen_range(1.0 - cfg.hardware_jitter..=1.0 + cfg.hardware_jitter)
    } else {
        inputs.hardware_cost
    };

    let labor = sim_hours * sim_rate;

    let rework = if rng.gen::<f64>() < rework_probability {
        labor * rng.gen_range(cfg.rework_cost_min..=cfg.rework_cost_max)
    } else {
        0.0
    };

    let delay_weeks = match delay_dist {
        Some(dist) => dist.sample(rng).max(0.0),
        None => 0.0,
    };

    labor
        + sim_hardware
        + labor * inputs.risk_buffer_pct
        + rework
        + delay_weeks * cfg.delay_cost_per_week
}

/// Index-based percentile over a sorted slice (matches the convention of
/// the calibration survey tooling: `floor(n * q)`, clamped).
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let idx = ((sorted.len() as f64 * q) as usize).min(sorted.len() - 1);
    sorted[idx]
}

fn build_histogram(sorted: &[f64], bins: usize) -> Histogram {
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };
    let mut centers = Vec::with_capacity(bins);
    let mut frequencies = vec![0u32; bins];
    for i in 0..bins {
        centers.push(min + (i as f64 + 0.5) * width);
    }
    for cost in sorted {
        let idx = (((cost - min) / width) as usize).min(bins - 1);
        frequencies[idx] += 1;
    }
    Histogram {
        bins: centers,
        frequencies,
    }
}
