//! Configuration for the resolution and recommendation engine.

use chrono::{DateTime, Utc};

use crate::error::EngineError;

/// Blend of node and link scores in a mapping total.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreWeights {
    pub node: f64,
    pub link: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            node: 0.7,
            link: 0.3,
        }
    }
}

/// Blend of the four recommendation axes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecommendationWeights {
    pub performance: f64,
    pub availability: f64,
    pub efficiency: f64,
    pub reliability: f64,
}

impl Default for RecommendationWeights {
    fn default() -> Self {
        Self {
            performance: 0.30,
            availability: 0.25,
            efficiency: 0.25,
            reliability: 0.20,
        }
    }
}

/// Engine configuration.
///
/// Controls how many options are returned, how far back history is read, the
/// forecast horizons, and the score blends.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    // --- Resolution ---
    /// Maximum mappings returned by `resolve`.
    pub num_options: usize,
    /// Maximum base mappings `suggest` ranks.
    pub suggest_options: usize,

    // --- History ---
    /// Lookback of the statistics used for score adjustment and ranking.
    pub stats_lookback_days: u32,
    /// Lookback of the statistics used for forecast confidence.
    pub forecast_stats_lookback_days: u32,

    // --- Forecasting ---
    /// Default forecast horizon.
    pub forecast_window_days: u32,
    /// Horizon scanned for a mapping's earliest common free slot.
    pub mapping_slot_horizon_days: u32,

    /// Instant history lookbacks are measured from. `None` uses the current time.
    pub reference_time: Option<DateTime<Utc>>,

    // --- Weights ---
    pub score_weights: ScoreWeights,
    pub recommendation_weights: RecommendationWeights,
}

impl EngineConfig {
    /// Lookback anchor for history queries.
    pub fn now(&self) -> DateTime<Utc> {
        self.reference_time.unwrap_or_else(Utc::now)
    }

    pub fn with_reference_time(mut self, at: DateTime<Utc>) -> Self {
        self.reference_time = Some(at);
        self
    }

    /// Checks option counts and that each weight blend sums to 1.
    pub fn validate(&self) -> Result<(), EngineError> {
        const EPS: f64 = 1e-9;

        if self.num_options == 0 || self.suggest_options == 0 {
            return Err(EngineError::InvalidConfig(
                "option counts must be at least 1".to_string(),
            ));
        }

        let score_sum = self.score_weights.node + self.score_weights.link;
        if (score_sum - 1.0).abs() > EPS {
            return Err(EngineError::InvalidConfig(format!(
                "score weights sum to {score_sum}, expected 1"
            )));
        }

        let r = &self.recommendation_weights;
        let rec_sum = r.performance + r.availability + r.efficiency + r.reliability;
        if (rec_sum - 1.0).abs() > EPS {
            return Err(EngineError::InvalidConfig(format!(
                "recommendation weights sum to {rec_sum}, expected 1"
            )));
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_options: 3,
            suggest_options: 5,
            stats_lookback_days: 90,
            forecast_stats_lookback_days: 30,
            forecast_window_days: 7,
            mapping_slot_horizon_days: 14,
            reference_time: None,
            score_weights: ScoreWeights::default(),
            recommendation_weights: RecommendationWeights::default(),
        }
    }
}
