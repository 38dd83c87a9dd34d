//! Link resolver: realizes logical edges on the physical graph.

use std::collections::HashMap;

use crate::graph::PhysicalGraph;
use crate::round_to;
use crate::topology::{LinkMapping, LinkResolution, LogicalEdge};
use crate::DeviceId;

/// Score of a pair with no physical path between them.
pub const UNREACHABLE_SCORE: f64 = 0.3;

/// Resolves every edge against the node assignment, in input order.
///
/// # Panics
///
/// Panics if an assigned device is not part of `graph`.
pub fn resolve_links(
    edges: &[LogicalEdge],
    assignment: &HashMap<&str, DeviceId>,
    graph: &PhysicalGraph,
) -> Vec<LinkMapping> {
    edges
        .iter()
        .map(|edge| {
            let source = assignment.get(edge.source.as_str()).copied();
            let target = assignment.get(edge.target.as_str()).copied();
            let resolution = match (source, target) {
                (Some(a), Some(b)) => classify(graph, a, b),
                _ => LinkResolution::Unmapped,
            };

            LinkMapping {
                logical_edge_id: edge.effective_id(),
                source_node: edge.source.clone(),
                target_node: edge.target.clone(),
                physical_link_id: source.zip(target).map(|(a, b)| format!("link-{a}-{b}")),
                fit_score: round_to(link_score(resolution), 2),
                resolution,
                explanation: explain(resolution),
            }
        })
        .collect()
}

/// Classifies the physical connectivity between two mapped devices.
pub fn classify(graph: &PhysicalGraph, a: DeviceId, b: DeviceId) -> LinkResolution {
    if a == b {
        if !graph.contains(a) {
            panic!("device {a} is not part of the physical graph");
        }
        return LinkResolution::SameDevice;
    }
    if graph.has_edge(a, b) {
        return LinkResolution::Direct;
    }
    match graph.hop_count(a, b) {
        Some(hops) => LinkResolution::Path { hops },
        None => LinkResolution::Unreachable,
    }
}

/// Fit score of a link resolution.
///
/// Paths lose 0.2 per hop beyond the first, never dropping below 0.5.
pub fn link_score(resolution: LinkResolution) -> f64 {
    match resolution {
        LinkResolution::Unmapped => 0.0,
        LinkResolution::SameDevice | LinkResolution::Direct => 1.0,
        LinkResolution::Path { hops } => (1.0 - hops.saturating_sub(1) as f64 * 0.2).max(0.5),
        LinkResolution::Unreachable => UNREACHABLE_SCORE,
    }
}

fn explain(resolution: LinkResolution) -> String {
    match resolution {
        LinkResolution::Unmapped => "Source or target device not mapped".to_string(),
        LinkResolution::SameDevice => "Both endpoints on the same device".to_string(),
        LinkResolution::Direct => "Direct physical connection".to_string(),
        LinkResolution::Path { hops } => format!("Indirect connection (path length: {hops})"),
        LinkResolution::Unreachable => {
            "No physical path (may require additional configuration)".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{DeviceType, PhysicalDevice, Snapshot};
    use crate::window::TimeWindow;
    use chrono::{TimeZone, Utc};

    /// otdr(1) - fiber(2) - roadm(3) - transceiver(4)
    fn graph() -> PhysicalGraph {
        let devices = vec![
            PhysicalDevice::new(1, DeviceType::Otdr, "otdr-1"),
            PhysicalDevice::new(2, DeviceType::Fiber, "fiber-2"),
            PhysicalDevice::new(3, DeviceType::Roadm, "roadm-3"),
            PhysicalDevice::new(4, DeviceType::Transceiver, "trx-4"),
        ];
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();
        PhysicalGraph::build(&Snapshot::new(devices, vec![]), TimeWindow::from_days(start, 7))
    }

    #[test]
    fn test_classify() {
        let g = graph();
        assert_eq!(classify(&g, 1, 2), LinkResolution::Direct);
        assert_eq!(classify(&g, 1, 3), LinkResolution::Path { hops: 2 });
        assert_eq!(classify(&g, 1, 4), LinkResolution::Path { hops: 3 });
        assert_eq!(classify(&g, 2, 2), LinkResolution::SameDevice);
    }

    #[test]
    fn test_unreachable() {
        let devices = vec![
            PhysicalDevice::new(1, DeviceType::Otdr, "otdr-1"),
            PhysicalDevice::new(2, DeviceType::Switch, "switch-2"),
        ];
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();
        let g = PhysicalGraph::build(&Snapshot::new(devices, vec![]), TimeWindow::from_days(start, 7));
        assert_eq!(classify(&g, 1, 2), LinkResolution::Unreachable);
    }

    #[test]
    fn test_scores_decrease_with_hops() {
        let direct = link_score(LinkResolution::Direct);
        let two = link_score(LinkResolution::Path { hops: 2 });
        let three = link_score(LinkResolution::Path { hops: 3 });
        let four = link_score(LinkResolution::Path { hops: 4 });
        let unreachable = link_score(LinkResolution::Unreachable);

        assert_eq!(direct, 1.0);
        assert!(direct > two && two > three && three > four);
        assert_eq!(four, 0.5);
        assert_eq!(link_score(LinkResolution::Path { hops: 9 }), 0.5);
        assert_eq!(unreachable, 0.3);
        assert!(unreachable < three);
    }

    #[test]
    fn test_resolve_links() {
        let g = graph();
        let assignment: HashMap<&str, DeviceId> = HashMap::from([("o", 1), ("r", 3)]);
        let edges = vec![
            LogicalEdge::new("o", "r").with_id("e1"),
            LogicalEdge::new("r", "missing"),
        ];
        let links = resolve_links(&edges, &assignment, &g);

        assert_eq!(links[0].logical_edge_id, "e1");
        assert_eq!(links[0].physical_link_id.as_deref(), Some("link-1-3"));
        assert_eq!(links[0].fit_score, 0.8);
        assert_eq!(links[0].explanation, "Indirect connection (path length: 2)");

        assert_eq!(links[1].logical_edge_id, "r-missing");
        assert_eq!(links[1].resolution, LinkResolution::Unmapped);
        assert_eq!(links[1].physical_link_id, None);
        assert_eq!(links[1].fit_score, 0.0);
    }

    #[test]
    #[should_panic(expected = "not part of the physical graph")]
    fn test_assigned_device_outside_graph_panics() {
        let g = graph();
        let assignment: HashMap<&str, DeviceId> = HashMap::from([("a", 1), ("b", 42)]);
        resolve_links(&[LogicalEdge::new("a", "b")], &assignment, &g);
    }
}
