pub mod resolve;

pub use resolve::{
    allocate, default_policies, match_node, resolve_links, run_strategies, AllocationInput,
    BalancedDistribution, ConnectionOptimized, GreedyBestFit,
};

use std::collections::HashMap;

use crate::graph::PhysicalGraph;
use crate::topology::Candidate;
use crate::DeviceId;

/// Allocation state visible to a policy while it scores one logical node.
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext<'a> {
    pub graph: &'a PhysicalGraph,
    /// Assignments made so far, per device.
    pub usage: &'a HashMap<DeviceId, usize>,
    /// Devices already assigned to the node's logical neighbors.
    pub mapped_neighbors: &'a [DeviceId],
}

impl PolicyContext<'_> {
    pub fn times_used(&self, device: DeviceId) -> usize {
        self.usage.get(&device).copied().unwrap_or(0)
    }
}

/// A policy's verdict on one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyScore {
    /// Ordering key among the node's candidates.
    pub rank: f64,
    /// Fit score recorded on the node mapping when the candidate is picked.
    pub fit: f64,
}

/// Scoring step of the allocation walk.
///
/// Every strategy shares the same walk over the logical nodes: gather candidates of
/// the node's type, score them with the policy, pick the best. Policies differ only in
/// how they restrict the pool and adjust the matcher's fit score.
pub trait ScoringPolicy: Send + Sync {
    /// Strategy name, used as the mapping id.
    fn name(&self) -> &'static str;

    /// Human-readable description stored in the mapping notes.
    fn notes(&self) -> &'static str;

    /// Whether devices already assigned are left out of the pool while unused ones
    /// remain.
    fn excludes_used(&self) -> bool;

    /// Scores `candidate` given the allocation so far.
    fn score(&self, candidate: &Candidate, ctx: &PolicyContext<'_>) -> PolicyScore;
}
