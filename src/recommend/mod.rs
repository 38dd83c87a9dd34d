//! Recommendations over resolved mappings and device availability forecasts.

mod forecast;
mod ranker;

pub use forecast::{booking_density, earliest_available_slot, ForecastResult, Forecaster};
pub use ranker::{rationale, AxisScores, Ranker, RecommendationResult};
