//! Heuristic type-compatibility table for physical connections.

use crate::inventory::DeviceType;

/// Unordered device-type pairs that can be cabled together.
const COMPATIBLE_PAIRS: [(DeviceType, DeviceType); 7] = [
    (DeviceType::Roadm, DeviceType::Fiber),
    (DeviceType::Roadm, DeviceType::Ila),
    (DeviceType::Roadm, DeviceType::Transceiver),
    (DeviceType::Roadm, DeviceType::Switch),
    (DeviceType::Fiber, DeviceType::Ila),
    (DeviceType::Fiber, DeviceType::Otdr),
    (DeviceType::Transceiver, DeviceType::Switch),
];

/// Returns true if devices of type `a` and `b` can be directly connected.
///
/// Symmetric. Same-type pairs are never compatible.
pub fn can_connect(a: DeviceType, b: DeviceType) -> bool {
    COMPATIBLE_PAIRS
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}
