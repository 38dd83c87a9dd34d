//! labtopo - logical-to-physical topology resolution for lab device booking
//!
//! Turns an abstract network diagram (device roles plus connections) into concrete
//! device assignments that are free for a requested time window, ranks them by fit and
//! historical reliability, and forecasts future device availability.
//!
//! The entry point is [`TopologyEngine`], which reads devices and reservations through
//! an [`InventoryStore`](inventory::InventoryStore) and never writes anything back.

pub mod algorithms;
pub mod availability;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod history;
pub mod inventory;
pub mod recommend;
pub mod topology;
pub mod window;

pub use config::EngineConfig;
pub use engine::TopologyEngine;
pub use error::EngineError;
pub use recommend::{ForecastResult, RecommendationResult};
pub use topology::{LogicalEdge, LogicalNode, TopologyMapping};
pub use window::TimeWindow;

/// Identifier of a physical inventory device.
pub type DeviceId = u64;

/// Identifier type used for logical nodes, edges and mappings.
pub type Id = String;

/// Rounds `value` to `places` decimal digits.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Arithmetic mean, or `None` for an empty sequence.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Clamps `value` into `[0, 1]`.
pub(crate) fn unit_clamp(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
