//! Availability oracle: is a device free over a window?
//!
//! A device is unavailable when any of these hold:
//! - its status blocks booking (maintenance, unavailable, broken)
//! - it is in maintenance: status is `maintenance`, or a maintenance marker range
//!   overlaps the window (unparsable markers are ignored)
//! - a pending, confirmed or conflicting reservation overlaps the window
//!   (`res.start < window.end && res.end > window.start`)

use crate::inventory::{PhysicalDevice, ReservationRecord};
use crate::window::TimeWindow;

/// Why a device was judged available or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityVerdict {
    pub available: bool,
    pub in_maintenance: bool,
    pub blocking_reservations: usize,
}

/// Returns true if `device` is in maintenance at some point of `window`.
pub fn in_maintenance(device: &PhysicalDevice, window: &TimeWindow) -> bool {
    device.status.is_maintenance()
        || device.maintenance.iter().any(|m| m.overlaps(window))
}

/// Full availability evaluation of `device` against its own `reservations`.
///
/// Reservations belonging to other devices are ignored.
pub fn evaluate(
    device: &PhysicalDevice,
    window: &TimeWindow,
    reservations: &[ReservationRecord],
) -> AvailabilityVerdict {
    let in_maintenance = in_maintenance(device, window);
    let blocking_reservations = reservations
        .iter()
        .filter(|r| r.device_id == device.id && r.blocks(window))
        .count();
    let available =
        !device.status.blocks_booking() && !in_maintenance && blocking_reservations == 0;

    AvailabilityVerdict {
        available,
        in_maintenance,
        blocking_reservations,
    }
}

/// Returns true if `device` can be booked for the whole `window`.
pub fn is_available(
    device: &PhysicalDevice,
    window: &TimeWindow,
    reservations: &[ReservationRecord],
) -> bool {
    evaluate(device, window, reservations).available
}
