//! Candidate matcher: ranks physical devices for one logical node.

use crate::graph::{DeviceNode, PhysicalGraph};
use crate::inventory::DeviceStatus;
use crate::topology::{Candidate, LogicalNode, NodeParameters};
use crate::DeviceId;

use super::ordering::compare_candidates;

/// Scores every device in `candidate_ids` whose type matches `node`.
///
/// Returned best first, ties by ascending device id. `has_edges` notes in the
/// explanation that the node takes part in logical connections.
///
/// # Panics
///
/// Panics if a candidate id is not part of `graph`.
pub fn match_node(
    graph: &PhysicalGraph,
    node: &LogicalNode,
    candidate_ids: &[DeviceId],
    has_edges: bool,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = candidate_ids
        .iter()
        .map(|&id| match graph.node(id) {
            Some(device) => device,
            None => panic!("candidate device {id} is not part of the physical graph"),
        })
        .filter(|device| device.device_type == node.device_type)
        .map(|device| {
            let (fit_score, explanation) = fit_score(device, &node.parameters, has_edges);
            Candidate {
                device_id: device.id,
                name: device.name.clone(),
                device_type: device.device_type,
                fit_score,
                explanation,
                available: device.available,
            }
        })
        .collect();

    candidates.sort_by(compare_candidates);
    candidates
}

/// Fit score in `[0, 1]` and its explanation.
///
/// Type match is a precondition. Unavailable devices and devices in maintenance score
/// 0. Node parameters are listed but do not change the score.
fn fit_score(device: &DeviceNode, params: &NodeParameters, has_edges: bool) -> (f64, String) {
    let mut factors = vec!["Type match: ✓".to_string()];

    if !device.available {
        factors.push("Availability: ✗ (not available in time range)".to_string());
        return (0.0, factors.join(" | "));
    }
    factors.push("Availability: ✓".to_string());

    let mut score = 1.0;
    match device.status {
        DeviceStatus::Available => factors.push("Status: ✓".to_string()),
        status if status.is_maintenance() => {
            score = 0.0;
            factors.push("Status: ✗ (maintenance)".to_string());
        }
        other => factors.push(format!("Status: {other}")),
    }

    let attributes = attribute_notes(params);
    if !attributes.is_empty() {
        factors.push(format!("Attributes: {}", attributes.join(" | ")));
    }

    if has_edges {
        factors.push("Connections: compatible".to_string());
    }

    (score, factors.join(" | "))
}

// The inventory has no vendor, port count, length or gain to compare against.
fn attribute_notes(params: &NodeParameters) -> Vec<String> {
    let mut notes = Vec::new();
    if let Some(vendor) = &params.vendor {
        notes.push(format!("Vendor: {vendor} (not checked)"));
    }
    if let Some(ports) = params.ports {
        notes.push(format!("Ports: {ports} (not checked)"));
    }
    if params.length_km.is_some() {
        notes.push("Length: acceptable".to_string());
    }
    if params.gain_db.is_some() {
        notes.push("Gain: acceptable".to_string());
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{
        DeviceType, PhysicalDevice, ReservationRecord, ReservationStatus, Snapshot,
    };
    use crate::window::TimeWindow;
    use chrono::{TimeZone, Utc};

    fn window() -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 17, 0, 0, 0).unwrap(),
        )
    }

    fn graph() -> PhysicalGraph {
        let devices = vec![
            PhysicalDevice::new(7, DeviceType::Fiber, "fiber-7"),
            PhysicalDevice::new(2, DeviceType::Fiber, "fiber-2").with_status(DeviceStatus::Active),
            PhysicalDevice::new(3, DeviceType::Fiber, "fiber-3"),
            PhysicalDevice::new(4, DeviceType::Roadm, "roadm-4"),
        ];
        let booked = ReservationRecord::new(
            3,
            window().start(),
            window().end(),
            ReservationStatus::Confirmed,
        );
        PhysicalGraph::build(&Snapshot::new(devices, vec![booked]), window())
    }

    #[test]
    fn test_filters_by_type_and_orders() {
        let node = LogicalNode::new("f1", DeviceType::Fiber);
        let found = match_node(&graph(), &node, &[7, 4, 3, 2], false);
        let ids: Vec<DeviceId> = found.iter().map(|c| c.device_id).collect();
        assert_eq!(ids, vec![2, 7, 3]);
        assert_eq!(found[0].fit_score, 1.0);
        assert_eq!(found[2].fit_score, 0.0);
        assert!(!found[2].available);
    }

    #[test]
    fn test_explanations() {
        let node = LogicalNode::new("f1", DeviceType::Fiber).with_parameters(NodeParameters {
            length_km: Some(25.0),
            ..Default::default()
        });
        let found = match_node(&graph(), &node, &[2, 3, 7], true);

        assert_eq!(
            found[0].explanation,
            "Type match: ✓ | Availability: ✓ | Status: active | Attributes: Length: acceptable | Connections: compatible"
        );
        assert_eq!(
            found[1].explanation,
            "Type match: ✓ | Availability: ✓ | Status: ✓ | Attributes: Length: acceptable | Connections: compatible"
        );
        assert_eq!(
            found[2].explanation,
            "Type match: ✓ | Availability: ✗ (not available in time range)"
        );
    }

    #[test]
    fn test_parameters_do_not_change_score() {
        let plain = LogicalNode::new("f1", DeviceType::Fiber);
        let detailed = LogicalNode::new("f1", DeviceType::Fiber).with_parameters(NodeParameters {
            vendor: Some("acme".to_string()),
            ports: Some(4),
            length_km: Some(80.0),
            gain_db: Some(20.0),
        });
        let a = match_node(&graph(), &plain, &[7], false);
        let b = match_node(&graph(), &detailed, &[7], false);
        assert_eq!(a[0].fit_score, b[0].fit_score);
        assert!(b[0].explanation.contains("Vendor: acme (not checked)"));
        assert!(b[0].explanation.contains("Gain: acceptable"));
    }

    #[test]
    #[should_panic(expected = "not part of the physical graph")]
    fn test_unknown_candidate_panics() {
        let node = LogicalNode::new("f1", DeviceType::Fiber);
        match_node(&graph(), &node, &[99], false);
    }
}
