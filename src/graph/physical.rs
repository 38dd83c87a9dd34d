//! Window-specific graph over the physical inventory.

use std::collections::{BTreeMap, HashMap};

use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};
use tracing::debug;

use super::compatibility::can_connect;
use crate::availability;
use crate::inventory::{DevicePorts, DeviceStatus, DeviceType, Snapshot};
use crate::window::TimeWindow;
use crate::DeviceId;

/// A device as seen by the resolver for one window.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceNode {
    pub id: DeviceId,
    pub name: String,
    pub device_type: DeviceType,
    pub status: DeviceStatus,
    pub ip_address: Option<String>,
    pub ports: DevicePorts,
    /// Free for the whole window (status, maintenance and reservations checked).
    pub available: bool,
    pub in_maintenance: bool,
}

/// Undirected graph of inventory devices.
///
/// # Invariants
///
/// - One node per device id; nodes are inserted in ascending id order
/// - An edge joins every unordered pair whose types are compatible
/// - Availability is computed for the window the graph was built for, so a graph
///   must never be reused for another window or after reservations change
#[derive(Debug, Clone)]
pub struct PhysicalGraph {
    graph: UnGraph<DeviceNode, ()>,
    node_by_id: HashMap<DeviceId, NodeIndex>,
    window: TimeWindow,
}

impl PhysicalGraph {
    /// Builds the graph for `window` from a store snapshot.
    ///
    /// Compatibility edges are found pairwise, O(n²) in the device count. This is
    /// fine for lab inventories of a few hundred devices.
    pub fn build(snapshot: &Snapshot, window: TimeWindow) -> Self {
        let devices = snapshot.devices();
        let mut graph = UnGraph::with_capacity(devices.len(), 0);
        let mut node_by_id = HashMap::with_capacity(devices.len());

        for device in devices {
            if node_by_id.contains_key(&device.id) {
                continue;
            }
            let verdict =
                availability::evaluate(device, &window, snapshot.reservations_of(device.id));
            let node = graph.add_node(DeviceNode {
                id: device.id,
                name: device.name.clone(),
                device_type: device.device_type,
                status: device.status,
                ip_address: device.ip_address.clone(),
                ports: device.ports.clone(),
                available: verdict.available,
                in_maintenance: verdict.in_maintenance,
            });
            node_by_id.insert(device.id, node);
        }

        let indices: Vec<NodeIndex> = graph.node_indices().collect();
        for (i, &a) in indices.iter().enumerate() {
            for &b in &indices[i + 1..] {
                if can_connect(graph[a].device_type, graph[b].device_type) {
                    graph.add_edge(a, b, ());
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            window = %window,
            "built physical graph"
        );

        Self {
            graph,
            node_by_id,
            window,
        }
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: DeviceId) -> bool {
        self.node_by_id.contains_key(&id)
    }

    pub fn node(&self, id: DeviceId) -> Option<&DeviceNode> {
        self.node_by_id.get(&id).map(|&idx| &self.graph[idx])
    }

    /// Devices in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &DeviceNode> {
        self.graph.node_weights()
    }

    /// Returns true if a compatibility edge joins `a` and `b`.
    pub fn has_edge(&self, a: DeviceId, b: DeviceId) -> bool {
        match (self.node_by_id.get(&a), self.node_by_id.get(&b)) {
            (Some(&ia), Some(&ib)) => self.graph.contains_edge(ia, ib),
            _ => false,
        }
    }

    /// Edge count of the shortest path from `a` to `b`, or `None` if unreachable.
    ///
    /// # Panics
    ///
    /// Panics if either device is not part of the graph: callers only ask about
    /// devices they obtained from this graph.
    pub fn hop_count(&self, a: DeviceId, b: DeviceId) -> Option<usize> {
        let ia = self.index_of(a);
        let ib = self.index_of(b);
        dijkstra(&self.graph, ia, Some(ib), |_| 1usize)
            .get(&ib)
            .copied()
    }

    /// Available device ids grouped by type, each list ascending.
    pub fn available_by_type(&self) -> BTreeMap<DeviceType, Vec<DeviceId>> {
        let mut by_type: BTreeMap<DeviceType, Vec<DeviceId>> = BTreeMap::new();
        for node in self.nodes().filter(|n| n.available) {
            by_type.entry(node.device_type).or_default().push(node.id);
        }
        by_type
    }

    fn index_of(&self, id: DeviceId) -> NodeIndex {
        match self.node_by_id.get(&id) {
            Some(&idx) => idx,
            None => panic!("device {id} is not part of the physical graph"),
        }
    }
}
