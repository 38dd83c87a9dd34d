//! Blends heuristic fit scores with historical reliability and temporal risk.

use chrono::{Datelike, Weekday};

use super::stats::{StatisticsEngine, NEUTRAL_RELIABILITY};
use crate::config::ScoreWeights;
use crate::inventory::DeviceType;
use crate::topology::{Confidence, TopologyMapping};
use crate::window::TimeWindow;
use crate::{round_to, unit_clamp, DeviceId};

/// Shares of device and type reliability in the combined reliability.
const DEVICE_SHARE: f64 = 0.7;
const TYPE_SHARE: f64 = 0.3;
/// Adjustments at or below this magnitude leave the explanation untouched.
const NOTABLE_ADJUSTMENT: f64 = 0.01;

/// Score change for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    /// Adjusted fit score, clamped to `[0, 1]` and rounded to 3 decimals.
    pub score: f64,
    /// In `[-0.1, 0.1]`.
    pub reliability_adjustment: f64,
    pub time_adjustment: f64,
    /// Appended to the node explanation, when the reliability change is notable.
    pub explanation: Option<String>,
}

/// Applies history-driven adjustments to mappings.
#[derive(Debug, Clone, Copy)]
pub struct ScoreAdjuster<'a> {
    stats: StatisticsEngine<'a>,
    lookback_days: u32,
    weights: ScoreWeights,
}

impl<'a> ScoreAdjuster<'a> {
    pub fn new(stats: StatisticsEngine<'a>, lookback_days: u32, weights: ScoreWeights) -> Self {
        Self {
            stats,
            lookback_days,
            weights,
        }
    }

    /// Adjusts one node's `base` score for `device` over `window`.
    pub fn adjust_score(
        &self,
        device: DeviceId,
        device_type: DeviceType,
        base: f64,
        window: &TimeWindow,
    ) -> Adjustment {
        let device_stats = self.stats.device_stats(device, self.lookback_days);
        let type_stats = self.stats.type_stats(device_type, self.lookback_days);

        let combined = DEVICE_SHARE * device_stats.reliability_score
            + TYPE_SHARE * type_stats.reliability_score;
        let reliability_adjustment = (combined - NEUTRAL_RELIABILITY) * 0.2;
        let time_adjustment = time_adjustment(window);
        let score = round_to(
            unit_clamp(base + reliability_adjustment + time_adjustment),
            3,
        );

        let explanation = (reliability_adjustment.abs() > NOTABLE_ADJUSTMENT).then(|| {
            let mut parts = Vec::new();
            if device_stats.has_history() {
                parts.push(format!(
                    "Device reliability: {} ({} success rate)",
                    percent(device_stats.reliability_score),
                    percent(device_stats.success_rate)
                ));
            }
            if type_stats.has_history() {
                parts.push(format!(
                    "Type reliability: {}",
                    percent(type_stats.reliability_score)
                ));
            }
            let direction = if reliability_adjustment > 0.0 {
                "improved"
            } else {
                "reduced"
            };
            parts.push(format!(
                "Score {direction} by {} based on historical performance",
                percent(reliability_adjustment.abs())
            ));
            parts.join(" | ")
        });

        Adjustment {
            score,
            reliability_adjustment,
            time_adjustment,
            explanation,
        }
    }

    /// Returns `mapping` with every assigned node adjusted and the total recomputed.
    ///
    /// Link mappings are kept as they are.
    pub fn adjust_mapping(&self, mapping: &TopologyMapping, window: &TimeWindow) -> TopologyMapping {
        let mut adjusted = mapping.clone();
        for node in &mut adjusted.node_mappings {
            let (Some(device), Some(device_type)) = (node.physical_device_id, node.physical_device_type)
            else {
                continue;
            };
            let adjustment = self.adjust_score(device, device_type, node.fit_score, window);
            node.fit_score = adjustment.score;
            node.confidence = Confidence::from_score(adjustment.score);
            if let Some(extra) = adjustment.explanation {
                node.explanation = if node.explanation.is_empty() {
                    extra
                } else {
                    format!("{} | {extra}", node.explanation)
                };
            }
        }
        adjusted.recompute_total(&self.weights);
        adjusted
    }
}

/// Temporal risk of a window.
///
/// −0.02 if the window touches a Saturday or Sunday or spans more than 5 calendar
/// days, and a further −0.01 beyond 7 days.
pub fn time_adjustment(window: &TimeWindow) -> f64 {
    let days = window.calendar_days();
    let touches_weekend = window
        .dates()
        .any(|d| matches!(d.weekday(), Weekday::Sat | Weekday::Sun));

    let mut adjustment = 0.0;
    if touches_weekend || days > 5 {
        adjustment -= 0.02;
    }
    if days > 7 {
        adjustment -= 0.01;
    }
    adjustment
}

fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{PhysicalDevice, ReservationRecord, ReservationStatus, Snapshot};
    use crate::topology::NodeMapping;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, month, day, 0, 0, 0).unwrap()
    }

    // 2025-06-02 is a Monday.
    fn weekdays() -> TimeWindow {
        TimeWindow::new(at(6, 2), at(6, 5))
    }

    fn snapshot() -> Snapshot {
        let reservations = (0..10)
            .map(|i| {
                let start = at(5, 1) + Duration::days(i);
                ReservationRecord::new(1, start, start + Duration::hours(8), ReservationStatus::Confirmed)
            })
            .collect();
        Snapshot::new(
            vec![
                PhysicalDevice::new(1, DeviceType::Roadm, "roadm-1"),
                PhysicalDevice::new(2, DeviceType::Fiber, "fiber-2"),
            ],
            reservations,
        )
    }

    fn adjuster(snap: &Snapshot) -> ScoreAdjuster<'_> {
        ScoreAdjuster::new(
            StatisticsEngine::new(snap, at(6, 1)),
            90,
            ScoreWeights::default(),
        )
    }

    #[test]
    fn test_time_adjustment() {
        assert_eq!(time_adjustment(&weekdays()), 0.0);
        // Friday to Saturday
        let weekend = TimeWindow::new(at(6, 6), at(6, 7));
        assert_eq!(time_adjustment(&weekend), -0.02);
        // Monday to Thursday of the following week: 10 days, crosses a weekend
        let long = TimeWindow::new(at(6, 2), at(6, 12));
        assert!((time_adjustment(&long) + 0.03).abs() < 1e-9);
    }

    #[test]
    fn test_reliable_device_is_boosted() {
        let snap = snapshot();
        // device and type reliability 1.0 -> +0.1, clamped at 1.0
        let a = adjuster(&snap).adjust_score(1, DeviceType::Roadm, 0.8, &weekdays());
        assert!((a.reliability_adjustment - 0.1).abs() < 1e-9);
        assert_eq!(a.score, 0.9);
        assert_eq!(
            a.explanation.as_deref(),
            Some(
                "Device reliability: 100.0% (100.0% success rate) | Type reliability: 100.0% \
                 | Score improved by 10.0% based on historical performance"
            )
        );

        let capped = adjuster(&snap).adjust_score(1, DeviceType::Roadm, 1.0, &weekdays());
        assert_eq!(capped.score, 1.0);
    }

    #[test]
    fn test_no_history_is_neutral() {
        let snap = snapshot();
        let a = adjuster(&snap).adjust_score(2, DeviceType::Fiber, 1.0, &weekdays());
        assert!(a.reliability_adjustment.abs() < 1e-9);
        assert_eq!(a.score, 1.0);
        assert_eq!(a.explanation, None);
    }

    #[test]
    fn test_adjust_mapping_recomputes_total() {
        let snap = snapshot();
        let node = |id: &str, device: DeviceId, device_type: DeviceType| NodeMapping {
            logical_node_id: id.to_string(),
            physical_device_id: Some(device),
            physical_device_name: format!("dev-{device}"),
            physical_device_type: Some(device_type),
            fit_score: 0.8,
            confidence: Confidence::High,
            alternatives: vec![],
            explanation: "Type match: ✓".to_string(),
            available: true,
        };
        let mapping = TopologyMapping {
            mapping_id: "greedy-best-fit".to_string(),
            total_fit_score: 0.56,
            node_mappings: vec![node("r", 1, DeviceType::Roadm), node("f", 2, DeviceType::Fiber)],
            link_mappings: vec![],
            notes: String::new(),
        };

        // Friday to Saturday: -0.02 on every node
        let weekend = TimeWindow::new(at(6, 6), at(6, 7));
        let adjusted = adjuster(&snap).adjust_mapping(&mapping, &weekend);
        assert_eq!(adjusted.node_mappings[0].fit_score, 0.88);
        assert!(adjusted.node_mappings[0]
            .explanation
            .starts_with("Type match: ✓ | Device reliability"));
        assert_eq!(adjusted.node_mappings[1].fit_score, 0.78);
        assert_eq!(adjusted.node_mappings[1].confidence, Confidence::Medium);
        assert_eq!(adjusted.node_mappings[1].explanation, "Type match: ✓");
        // 0.7 * mean(0.88, 0.78)
        assert_eq!(adjusted.total_fit_score, 0.58);
        assert_eq!(mapping.node_mappings[0].fit_score, 0.8);
    }
}
