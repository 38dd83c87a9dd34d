//! Reservation records consumed from the booking store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::error::ParseError;
use crate::window::TimeWindow;
use crate::DeviceId;

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Conflicting,
    Cancelled,
    Expired,
    Rejected,
}

impl ReservationStatus {
    const ALL: [ReservationStatus; 6] = [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Conflicting,
        ReservationStatus::Cancelled,
        ReservationStatus::Expired,
        ReservationStatus::Rejected,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "PENDING",
            ReservationStatus::Confirmed => "CONFIRMED",
            ReservationStatus::Conflicting => "CONFLICTING",
            ReservationStatus::Cancelled => "CANCELLED",
            ReservationStatus::Expired => "EXPIRED",
            ReservationStatus::Rejected => "REJECTED",
        }
    }

    /// Pending, confirmed and conflicting reservations hold the device.
    pub const fn holds_device(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Pending
                | ReservationStatus::Confirmed
                | ReservationStatus::Conflicting
        )
    }

    /// Statuses counted as booked time in historical density.
    pub const fn counts_as_booked(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ReservationStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseError::UnknownReservationStatus(s.to_string()))
    }
}

/// A booking of one device over `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReservationRecord {
    pub device_id: DeviceId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: ReservationStatus,
}

impl ReservationRecord {
    pub fn new(
        device_id: DeviceId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: ReservationStatus,
    ) -> Self {
        Self {
            device_id,
            start,
            end,
            status,
        }
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end)
    }

    /// Returns true if the reservation holds the device at any point of `window`.
    pub fn blocks(&self, window: &TimeWindow) -> bool {
        self.status.holds_device() && self.window().overlaps(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "confirmed".parse::<ReservationStatus>().unwrap(),
            ReservationStatus::Confirmed
        );
        assert!("DONE".parse::<ReservationStatus>().is_err());
    }

    #[test]
    fn test_only_active_statuses_block() {
        let window = TimeWindow::new(at(3), at(5));
        for status in ReservationStatus::ALL {
            let r = ReservationRecord::new(1, at(4), at(6), status);
            assert_eq!(r.blocks(&window), status.holds_device(), "{status}");
        }
    }

    #[test]
    fn test_back_to_back_does_not_block() {
        let window = TimeWindow::new(at(3), at(5));
        let r = ReservationRecord::new(1, at(5), at(7), ReservationStatus::Confirmed);
        assert!(!r.blocks(&window));
    }
}
