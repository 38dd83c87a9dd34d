//! Physical graph built from inventory for one booking window.
//!
//! Rebuilt on every call: node availability depends on the window and on the
//! reservations at the time of the call, so nothing is cached across calls.

mod compatibility;
mod physical;

pub use compatibility::can_connect;
pub use physical::{DeviceNode, PhysicalGraph};
