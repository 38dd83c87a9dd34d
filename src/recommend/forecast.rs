//! Availability forecasting from current reservations and booking history.

use chrono::{DateTime, Utc};

use crate::availability;
use crate::history::StatisticsEngine;
use crate::inventory::{PhysicalDevice, ReservationRecord};
use crate::window::{days_before, hours_between, TimeWindow};
use crate::{round_to, unit_clamp, DeviceId};

/// Probability floor for a device that is free right now.
const AVAILABLE_FLOOR: f64 = 0.7;
/// Confidence when the device has no recent history.
const DEFAULT_CONFIDENCE: f64 = 0.3;
/// Bookings needed for full confidence.
const CONFIDENT_BOOKINGS: f64 = 10.0;

/// Availability outlook of one device.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForecastResult {
    pub device_id: DeviceId,
    /// In `[0, 1]`, rounded to 3 decimals.
    pub availability_probability: f64,
    /// In `[0, 1]`, rounded to 3 decimals.
    pub confidence: f64,
    pub factors: Vec<String>,
    /// First instant in the horizon the device is not held, if any.
    pub earliest_available_slot: Option<DateTime<Utc>>,
}

/// Forecasts availability for devices of one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Forecaster<'a> {
    stats: StatisticsEngine<'a>,
    stats_lookback_days: u32,
}

impl<'a> Forecaster<'a> {
    pub fn new(stats: StatisticsEngine<'a>, stats_lookback_days: u32) -> Self {
        Self {
            stats,
            stats_lookback_days,
        }
    }

    /// Forecast for `device` over `window`, using `forecast_days` as both the history
    /// offset and the slot horizon.
    pub fn forecast(
        &self,
        device: &PhysicalDevice,
        reservations: &[ReservationRecord],
        window: &TimeWindow,
        forecast_days: u32,
    ) -> ForecastResult {
        let available_now = availability::is_available(device, window, reservations);
        let density = booking_density(reservations, window, forecast_days);
        let history = self.stats.device_stats(device.id, self.stats_lookback_days);

        let mut probability = unit_clamp(1.0 - density * 1.2);
        if available_now {
            probability = probability.max(AVAILABLE_FLOOR);
        }

        let confidence = if history.has_history() {
            (history.total_bookings as f64 / CONFIDENT_BOOKINGS).min(1.0)
        } else {
            DEFAULT_CONFIDENCE
        };

        let mut factors = Vec::new();
        if density > 0.5 {
            factors.push("High historical booking density".to_string());
        }
        if history.conflict_rate > 0.1 {
            factors.push("Frequent conflicts in past".to_string());
        }
        factors.push(if available_now {
            "Currently available".to_string()
        } else {
            "Currently booked".to_string()
        });

        ForecastResult {
            device_id: device.id,
            availability_probability: round_to(probability, 3),
            confidence: round_to(confidence, 3),
            factors,
            earliest_available_slot: earliest_available_slot(
                reservations,
                window.start(),
                forecast_days,
            ),
        }
    }
}

/// Booked share of the analogous past window `[start − 2d, end − d]`.
///
/// Sums the hours of confirmed and pending reservations lying entirely inside that
/// window, divided by the length of `window`, clamped to `[0, 1]`.
pub fn booking_density(
    reservations: &[ReservationRecord],
    window: &TimeWindow,
    forecast_days: u32,
) -> f64 {
    let Some(window_hours) = hours_between(window.start(), window.end()) else {
        return 0.0;
    };
    let offset = u64::from(forecast_days);
    let past = TimeWindow::new(
        days_before(window.start(), 2 * offset),
        days_before(window.end(), offset),
    );

    let booked: f64 = reservations
        .iter()
        .filter(|r| r.status.counts_as_booked())
        .filter(|r| r.start >= past.start() && r.end <= past.end())
        .filter_map(|r| hours_between(r.start, r.end))
        .map(|h| h.value())
        .sum();

    unit_clamp(booked / window_hours.value())
}

/// Earliest instant in `[from, from + days)` not held by a reservation.
///
/// Holding reservations overlapping the horizon are swept in start order; the first
/// gap before the horizon end is returned. `None` when the device is held through
/// the whole horizon.
pub fn earliest_available_slot(
    reservations: &[ReservationRecord],
    from: DateTime<Utc>,
    days: u32,
) -> Option<DateTime<Utc>> {
    let horizon = TimeWindow::from_days(from, i64::from(days));
    if horizon.is_degenerate() {
        return None;
    }

    let mut holding: Vec<&ReservationRecord> =
        reservations.iter().filter(|r| r.blocks(&horizon)).collect();
    holding.sort_by_key(|r| (r.start, r.end));

    let mut cursor = from;
    for r in holding {
        if cursor < r.start {
            return Some(cursor);
        }
        cursor = cursor.max(r.end);
    }
    (cursor < horizon.end()).then_some(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{DeviceType, ReservationStatus, Snapshot};
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    fn res(start: DateTime<Utc>, end: DateTime<Utc>, status: ReservationStatus) -> ReservationRecord {
        ReservationRecord::new(1, start, end, status)
    }

    #[test]
    fn test_slot_without_reservations_is_start() {
        assert_eq!(earliest_available_slot(&[], at(10, 0), 7), Some(at(10, 0)));
    }

    #[test]
    fn test_slot_after_leading_booking() {
        let r = [
            res(at(10, 0), at(11, 0), ReservationStatus::Confirmed),
            res(at(11, 0), at(12, 0), ReservationStatus::Pending),
            res(at(14, 0), at(15, 0), ReservationStatus::Confirmed),
        ];
        assert_eq!(earliest_available_slot(&r, at(10, 0), 7), Some(at(12, 0)));
    }

    #[test]
    fn test_slot_gap_before_first_booking() {
        let r = [res(at(11, 0), at(20, 0), ReservationStatus::Confirmed)];
        assert_eq!(earliest_available_slot(&r, at(10, 0), 7), Some(at(10, 0)));
    }

    #[test]
    fn test_fully_booked_horizon_has_no_slot() {
        let r = [res(at(9, 0), at(18, 0), ReservationStatus::Confirmed)];
        assert_eq!(earliest_available_slot(&r, at(10, 0), 7), None);
        let r = [res(at(10, 0), at(17, 0), ReservationStatus::Conflicting)];
        assert_eq!(earliest_available_slot(&r, at(10, 0), 7), None);
    }

    #[test]
    fn test_cancelled_bookings_leave_slot_open() {
        let r = [res(at(9, 0), at(18, 0), ReservationStatus::Cancelled)];
        assert_eq!(earliest_available_slot(&r, at(10, 0), 7), Some(at(10, 0)));
    }

    #[test]
    fn test_booking_density() {
        // Window 17..24 with 7 forecast days: analogous window is 3..17.
        let window = TimeWindow::new(at(17, 0), at(24, 0));
        let r = [
            res(at(5, 0), at(8, 12), ReservationStatus::Confirmed), // 84h
            res(at(10, 0), at(11, 0), ReservationStatus::Cancelled),
            res(at(16, 0), at(18, 0), ReservationStatus::Confirmed), // leaves the window
        ];
        let density = booking_density(&r, &window, 7);
        assert!((density - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_forecast_busy_device() {
        let device = PhysicalDevice::new(1, DeviceType::Roadm, "roadm-1");
        let window = TimeWindow::new(at(17, 0), at(24, 0));
        let reservations = vec![
            res(at(3, 0), at(10, 0), ReservationStatus::Confirmed),
            res(at(10, 0), at(17, 0), ReservationStatus::Conflicting),
            res(at(17, 0), at(24, 0), ReservationStatus::Confirmed),
        ];
        let snap = Snapshot::new(vec![device.clone()], reservations.clone());
        let stats = StatisticsEngine::new(&snap, at(25, 0));
        let f = Forecaster::new(stats, 30).forecast(&device, &reservations, &window, 7);

        // 168 booked hours (the conflicting one is not counted) over a 168h window
        assert_eq!(f.availability_probability, 0.0);
        assert_eq!(f.confidence, 0.3);
        assert_eq!(
            f.factors,
            vec![
                "High historical booking density",
                "Frequent conflicts in past",
                "Currently booked"
            ]
        );
        assert_eq!(f.earliest_available_slot, None);
    }

    #[test]
    fn test_forecast_free_device() {
        let device = PhysicalDevice::new(1, DeviceType::Roadm, "roadm-1");
        let window = TimeWindow::new(at(17, 0), at(24, 0));
        let snap = Snapshot::new(vec![device.clone()], vec![]);
        let f = Forecaster::new(StatisticsEngine::new(&snap, at(17, 0)), 30)
            .forecast(&device, &[], &window, 7);

        assert_eq!(f.availability_probability, 1.0);
        assert_eq!(f.factors, vec!["Currently available"]);
        assert_eq!(f.earliest_available_slot, Some(at(17, 0)));
    }
}
