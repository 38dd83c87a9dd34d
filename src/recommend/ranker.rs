//! Multi-factor ranking of adjusted mappings.
//!
//! Each mapping is scored on four axes in `[0, 1]`:
//! - **Performance**: mean node fit score
//! - **Availability**: share of nodes whose device is free for the window
//! - **Efficiency**: favors device reuse, `1 − (unique/total − 0.5) × 0.5`
//! - **Reliability**: mean historical reliability of the assigned devices

use chrono::{DateTime, Utc};

use super::forecast::earliest_available_slot;
use crate::config::RecommendationWeights;
use crate::history::{StatisticsEngine, NEUTRAL_RELIABILITY};
use crate::inventory::Snapshot;
use crate::topology::TopologyMapping;
use crate::{mean, round_to, unit_clamp};

/// A ranked mapping with its axis scores and rationale.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecommendationResult {
    pub mapping_id: String,
    pub recommendation_score: f64,
    pub performance_score: f64,
    pub availability_score: f64,
    pub efficiency_score: f64,
    pub reliability_score: f64,
    pub rationale: String,
    /// When every device of the mapping is free, within the slot horizon.
    pub earliest_available_slot: Option<DateTime<Utc>>,
    pub mapping: TopologyMapping,
}

/// Axis scores of one mapping, unrounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScores {
    pub performance: f64,
    pub availability: f64,
    pub efficiency: f64,
    pub reliability: f64,
}

impl AxisScores {
    pub fn weighted(&self, w: &RecommendationWeights) -> f64 {
        w.performance * self.performance
            + w.availability * self.availability
            + w.efficiency * self.efficiency
            + w.reliability * self.reliability
    }
}

/// Scores and orders mappings for one request.
#[derive(Debug, Clone, Copy)]
pub struct Ranker<'a> {
    snapshot: &'a Snapshot,
    stats: StatisticsEngine<'a>,
    lookback_days: u32,
    slot_horizon_days: u32,
    weights: RecommendationWeights,
}

impl<'a> Ranker<'a> {
    pub fn new(
        snapshot: &'a Snapshot,
        stats: StatisticsEngine<'a>,
        lookback_days: u32,
        slot_horizon_days: u32,
        weights: RecommendationWeights,
    ) -> Self {
        Self {
            snapshot,
            stats,
            lookback_days,
            slot_horizon_days,
            weights,
        }
    }

    pub fn axis_scores(&self, mapping: &TopologyMapping) -> AxisScores {
        let nodes = &mapping.node_mappings;
        if nodes.is_empty() {
            return AxisScores {
                performance: 0.0,
                availability: 0.0,
                efficiency: 0.0,
                reliability: NEUTRAL_RELIABILITY,
            };
        }
        let total = nodes.len() as f64;

        let performance = mean(nodes.iter().map(|n| n.fit_score)).unwrap_or(0.0);
        let availability = nodes.iter().filter(|n| n.available).count() as f64 / total;
        let unique = mapping.unique_devices().len() as f64;
        let efficiency = unit_clamp(1.0 - (unique / total - 0.5) * 0.5);
        let reliability = mean(nodes.iter().map(|n| {
            match (n.physical_device_id, n.physical_device_type) {
                (Some(id), _) => self.stats.device_stats(id, self.lookback_days).reliability_score,
                (None, Some(t)) => self.stats.type_stats(t, self.lookback_days).reliability_score,
                (None, None) => NEUTRAL_RELIABILITY,
            }
        }))
        .unwrap_or(NEUTRAL_RELIABILITY);

        AxisScores {
            performance,
            availability,
            efficiency,
            reliability,
        }
    }

    /// Latest of the per-device earliest slots from `from`.
    ///
    /// `None` if any device has no free instant within the horizon.
    pub fn earliest_slot(&self, mapping: &TopologyMapping, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let mut latest: Option<DateTime<Utc>> = None;
        for device in mapping.unique_devices() {
            let slot = earliest_available_slot(
                self.snapshot.reservations_of(device),
                from,
                self.slot_horizon_days,
            )?;
            latest = Some(latest.map_or(slot, |l| l.max(slot)));
        }
        latest
    }

    pub fn recommend(&self, mapping: TopologyMapping, from: DateTime<Utc>) -> RecommendationResult {
        let axes = self.axis_scores(&mapping);
        RecommendationResult {
            mapping_id: mapping.mapping_id.clone(),
            recommendation_score: round_to(axes.weighted(&self.weights), 3),
            performance_score: round_to(axes.performance, 3),
            availability_score: round_to(axes.availability, 3),
            efficiency_score: round_to(axes.efficiency, 3),
            reliability_score: round_to(axes.reliability, 3),
            rationale: rationale(&axes),
            earliest_available_slot: self.earliest_slot(&mapping, from),
            mapping,
        }
    }

    /// Recommends every mapping, best first. Equal scores keep the input order.
    pub fn rank(
        &self,
        mappings: impl IntoIterator<Item = TopologyMapping>,
        from: DateTime<Utc>,
    ) -> Vec<RecommendationResult> {
        let mut results: Vec<RecommendationResult> = mappings
            .into_iter()
            .map(|m| self.recommend(m, from))
            .collect();
        results.sort_by(|a, b| b.recommendation_score.total_cmp(&a.recommendation_score));
        results
    }
}

/// Fixed-threshold summary of the axis scores.
pub fn rationale(axes: &AxisScores) -> String {
    let mut parts = Vec::new();

    if axes.performance >= 0.8 {
        parts.push("Excellent performance fit");
    } else if axes.performance >= 0.6 {
        parts.push("Good performance fit");
    }

    if axes.availability >= 0.9 {
        parts.push("All devices available");
    } else if axes.availability >= 0.7 {
        parts.push("Most devices available");
    } else if axes.availability < 0.5 {
        parts.push("Limited availability");
    }

    if axes.efficiency >= 0.7 {
        parts.push("Efficient resource usage");
    }

    if axes.reliability >= 0.8 {
        parts.push("High historical reliability");
    } else if axes.reliability < 0.5 {
        parts.push("Lower reliability (check alternatives)");
    }

    if parts.is_empty() {
        "Standard configuration".to_string()
    } else {
        parts.join(" | ")
    }
}
