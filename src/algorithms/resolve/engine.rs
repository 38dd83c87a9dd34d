//! Allocation walk shared by every strategy.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::algorithms::{PolicyContext, ScoringPolicy};
use crate::config::ScoreWeights;
use crate::graph::PhysicalGraph;
use crate::inventory::DeviceType;
use crate::topology::{
    weighted_total, Candidate, Confidence, LogicalEdge, LogicalNode, NodeMapping,
    TopologyMapping,
};
use crate::DeviceId;

use super::links::resolve_links;
use super::matcher::match_node;
use super::ordering::compare_scored;

/// Alternatives kept per node mapping.
const MAX_ALTERNATIVES: usize = 3;

/// Everything an allocation walk reads.
#[derive(Debug, Clone, Copy)]
pub struct AllocationInput<'a> {
    pub graph: &'a PhysicalGraph,
    pub nodes: &'a [LogicalNode],
    pub edges: &'a [LogicalEdge],
    /// Available device ids per type, ascending.
    pub pool: &'a BTreeMap<DeviceType, Vec<DeviceId>>,
    pub weights: ScoreWeights,
}

struct Ranked {
    rank: f64,
    candidate: Candidate,
}

/// Runs one strategy over the logical nodes in input order.
///
/// Returns `None` as soon as a node has no candidate of its type: partial mappings
/// are never emitted.
pub fn allocate(policy: &dyn ScoringPolicy, input: &AllocationInput<'_>) -> Option<TopologyMapping> {
    let adjacency = logical_adjacency(input.edges);
    let has_edges = !input.edges.is_empty();

    let mut usage: HashMap<DeviceId, usize> = HashMap::new();
    let mut assignment: HashMap<&str, DeviceId> = HashMap::new();
    let mut node_mappings = Vec::with_capacity(input.nodes.len());

    for node in input.nodes {
        let pool = input
            .pool
            .get(&node.device_type)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let unused: Vec<DeviceId> = if policy.excludes_used() {
            pool.iter()
                .copied()
                .filter(|id| !usage.contains_key(id))
                .collect()
        } else {
            Vec::new()
        };
        let ids = if unused.is_empty() { pool } else { unused.as_slice() };

        let matches = match_node(input.graph, node, ids, has_edges);
        if matches.is_empty() {
            debug!(
                strategy = policy.name(),
                logical_node = %node.id,
                device_type = %node.device_type,
                "no candidates, strategy infeasible"
            );
            return None;
        }

        let mapped_neighbors: Vec<DeviceId> = adjacency
            .get(node.id.as_str())
            .map(|neighbors| {
                neighbors
                    .iter()
                    .filter_map(|n| assignment.get(n).copied())
                    .collect()
            })
            .unwrap_or_default();
        let ctx = PolicyContext {
            graph: input.graph,
            usage: &usage,
            mapped_neighbors: &mapped_neighbors,
        };

        let mut ranked: Vec<Ranked> = matches
            .into_iter()
            .map(|candidate| {
                let score = policy.score(&candidate, &ctx);
                Ranked {
                    rank: score.rank,
                    candidate: Candidate {
                        fit_score: score.fit,
                        ..candidate
                    },
                }
            })
            .collect();
        ranked.sort_by(|a, b| {
            compare_scored(a.rank, a.candidate.device_id, b.rank, b.candidate.device_id)
        });

        let mut ranked = ranked.into_iter().map(|r| r.candidate);
        let Some(best) = ranked.next() else {
            unreachable!("matches is non-empty");
        };
        let alternatives: Vec<Candidate> = ranked.take(MAX_ALTERNATIVES).collect();

        *usage.entry(best.device_id).or_insert(0) += 1;
        assignment.entry(node.id.as_str()).or_insert(best.device_id);

        node_mappings.push(NodeMapping {
            logical_node_id: node.id.clone(),
            physical_device_id: Some(best.device_id),
            physical_device_name: best.name,
            physical_device_type: Some(best.device_type),
            fit_score: best.fit_score,
            confidence: Confidence::from_score(best.fit_score),
            alternatives,
            explanation: best.explanation,
            available: best.available,
        });
    }

    let link_mappings = resolve_links(input.edges, &assignment, input.graph);
    let total_fit_score = weighted_total(
        node_mappings.iter().map(|m| m.fit_score),
        link_mappings.iter().map(|m| m.fit_score),
        &input.weights,
    );

    debug!(
        strategy = policy.name(),
        total_fit_score,
        "strategy produced a mapping"
    );

    Some(TopologyMapping {
        mapping_id: policy.name().to_string(),
        total_fit_score,
        node_mappings,
        link_mappings,
        notes: policy.notes().to_string(),
    })
}

/// Runs each policy independently and keeps the best `limit` mappings.
///
/// Infeasible strategies are skipped. Sorted by total score descending; equal totals
/// keep the policy order.
pub fn run_strategies(
    policies: &[Box<dyn ScoringPolicy>],
    input: &AllocationInput<'_>,
    limit: usize,
) -> Vec<TopologyMapping> {
    let mut mappings: Vec<TopologyMapping> = policies
        .iter()
        .filter_map(|policy| allocate(policy.as_ref(), input))
        .collect();
    mappings.sort_by(|a, b| b.total_fit_score.total_cmp(&a.total_fit_score));
    mappings.truncate(limit);
    mappings
}

/// Neighbor sets of each logical node, ignoring duplicate edges.
fn logical_adjacency(edges: &[LogicalEdge]) -> HashMap<&str, BTreeSet<&str>> {
    let mut adjacency: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for edge in edges {
        adjacency
            .entry(edge.source.as_str())
            .or_default()
            .insert(edge.target.as_str());
        adjacency
            .entry(edge.target.as_str())
            .or_default()
            .insert(edge.source.as_str());
    }
    adjacency
}
