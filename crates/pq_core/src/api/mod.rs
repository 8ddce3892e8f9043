//! JSON API surface for host integrations (CLI, services, UIs).

pub mod json_api;

pub use json_api::{
    acceptance_json, analyze_project_json, monte_carlo_json, optimize_margin_json,
    score_complexity_json,
};
