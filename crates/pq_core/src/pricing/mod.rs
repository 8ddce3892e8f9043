//! Pricing Models and Blending
//!
//! Five independent pure pricing functions over a shared `CostInputs`
//! structure, plus the formula/benchmark blender. No model mutates its
//! inputs; each returns a price with an itemized breakdown.

pub mod blend;
pub mod models;

pub use blend::{blend_price, BlendedPrice};
pub use models::{
    price_all, price_complexity_multiplier, price_fixed, price_hourly, price_modular,
    price_value_based, BreakdownLine, CostInputs, ModelPrice, PricingModelKind,
};
