//! Mapping results: logical nodes and edges assigned to physical devices and links.

use std::collections::HashSet;
use std::fmt;

use crate::config::ScoreWeights;
use crate::inventory::DeviceType;
use crate::{mean, DeviceId, Id};

/// A physical device considered for one logical node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    pub device_id: DeviceId,
    pub name: String,
    pub device_type: DeviceType,
    /// Match quality in `[0, 1]`.
    pub fit_score: f64,
    pub explanation: String,
    pub available: bool,
}

/// Coarse bucket of a fit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// `>= 0.8` high, `>= 0.5` medium, otherwise low.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Confidence::High
        } else if score >= 0.5 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        })
    }
}

/// Assignment of one logical node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeMapping {
    pub logical_node_id: Id,
    pub physical_device_id: Option<DeviceId>,
    pub physical_device_name: String,
    pub physical_device_type: Option<DeviceType>,
    pub fit_score: f64,
    pub confidence: Confidence,
    /// Up to three runner-up candidates, best first.
    pub alternatives: Vec<Candidate>,
    pub explanation: String,
    /// Whether the assigned device is free for the requested window.
    pub available: bool,
}

/// How a logical edge was realized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum LinkResolution {
    /// An endpoint has no device.
    Unmapped,
    /// Both endpoints share one device.
    SameDevice,
    /// A compatibility edge joins the two devices.
    Direct,
    /// Reachable through `hops` edges (`hops >= 2`).
    Path { hops: usize },
    /// No physical path.
    Unreachable,
}

/// Assignment of one logical edge.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkMapping {
    pub logical_edge_id: Id,
    pub source_node: Id,
    pub target_node: Id,
    /// `"link-<a>-<b>"` when both endpoints are mapped.
    pub physical_link_id: Option<String>,
    pub fit_score: f64,
    pub resolution: LinkResolution,
    pub explanation: String,
}

/// A complete realization of a logical topology produced by one strategy.
///
/// Only emitted when every logical node received a device.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TopologyMapping {
    /// Name of the strategy that produced the mapping.
    pub mapping_id: String,
    pub total_fit_score: f64,
    pub node_mappings: Vec<NodeMapping>,
    pub link_mappings: Vec<LinkMapping>,
    pub notes: String,
}

impl TopologyMapping {
    /// Recomputes `total_fit_score` from the current node and link scores.
    pub fn recompute_total(&mut self, weights: &ScoreWeights) {
        self.total_fit_score = weighted_total(
            self.node_mappings.iter().map(|m| m.fit_score),
            self.link_mappings.iter().map(|m| m.fit_score),
            weights,
        );
    }

    /// Distinct devices used by the mapping.
    pub fn unique_devices(&self) -> HashSet<DeviceId> {
        self.node_mappings
            .iter()
            .filter_map(|m| m.physical_device_id)
            .collect()
    }

    pub fn node_mapping(&self, logical_node_id: &str) -> Option<&NodeMapping> {
        self.node_mappings
            .iter()
            .find(|m| m.logical_node_id == logical_node_id)
    }
}

/// `node × mean(node scores) + link × mean(link scores)`, rounded to 2 decimals.
///
/// An empty side contributes 0.
pub fn weighted_total(
    node_scores: impl IntoIterator<Item = f64>,
    link_scores: impl IntoIterator<Item = f64>,
    weights: &ScoreWeights,
) -> f64 {
    let node = mean(node_scores).unwrap_or(0.0);
    let link = mean(link_scores).unwrap_or(0.0);
    crate::round_to(weights.node * node + weights.link * link, 2)
}
