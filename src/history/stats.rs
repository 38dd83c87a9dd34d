//! Historical statistics over past reservation outcomes.

use chrono::{DateTime, Utc};
use qtty::{Hour, Quantity};

use crate::inventory::{DeviceType, ReservationRecord, ReservationStatus, Snapshot};
use crate::window::{days_before, hours_between};
use crate::{mean, round_to, DeviceId};

/// Reliability assumed for a scope without history.
pub const NEUTRAL_RELIABILITY: f64 = 0.5;

/// What a statistic is aggregated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "value", rename_all = "snake_case"))]
pub enum StatsScope {
    Device(DeviceId),
    Type(DeviceType),
}

/// Reservation outcome metrics of one scope.
///
/// Rates are rounded to 3 decimals and the average duration to 2.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoricalStats {
    pub scope: StatsScope,
    pub total_bookings: usize,
    pub success_rate: f64,
    pub cancellation_rate: f64,
    pub conflict_rate: f64,
    pub avg_duration_hours: Quantity<Hour>,
    /// `success_rate × (1 − 0.5 × conflict_rate)`, or 0.5 without history.
    pub reliability_score: f64,
}

impl HistoricalStats {
    /// Stats of a scope with no bookings: zero rates and a neutral reliability.
    pub fn neutral(scope: StatsScope) -> Self {
        Self {
            scope,
            total_bookings: 0,
            success_rate: 0.0,
            cancellation_rate: 0.0,
            conflict_rate: 0.0,
            avg_duration_hours: Quantity::new(0.0),
            reliability_score: NEUTRAL_RELIABILITY,
        }
    }

    /// Aggregates `records`, all assumed to belong to `scope`.
    pub fn aggregate<'a>(
        scope: StatsScope,
        records: impl IntoIterator<Item = &'a ReservationRecord>,
    ) -> Self {
        let records: Vec<&ReservationRecord> = records.into_iter().collect();
        if records.is_empty() {
            return Self::neutral(scope);
        }

        let total = records.len() as f64;
        let rate = |status: ReservationStatus| {
            records.iter().filter(|r| r.status == status).count() as f64 / total
        };
        let success_rate = rate(ReservationStatus::Confirmed);
        let cancellation_rate = rate(ReservationStatus::Cancelled);
        let conflict_rate = rate(ReservationStatus::Conflicting);

        let avg_hours = mean(
            records
                .iter()
                .filter_map(|r| hours_between(r.start, r.end))
                .map(|h| h.value()),
        )
        .unwrap_or(0.0);

        Self {
            scope,
            total_bookings: records.len(),
            success_rate: round_to(success_rate, 3),
            cancellation_rate: round_to(cancellation_rate, 3),
            conflict_rate: round_to(conflict_rate, 3),
            avg_duration_hours: Quantity::new(round_to(avg_hours, 2)),
            reliability_score: round_to(success_rate * (1.0 - 0.5 * conflict_rate), 3),
        }
    }

    pub fn has_history(&self) -> bool {
        self.total_bookings > 0
    }
}

/// Computes [`HistoricalStats`] from a snapshot, looking back from `as_of`.
///
/// A reservation counts when it starts at or after `as_of − lookback`. Type scopes
/// cover every snapshot device of that type.
#[derive(Debug, Clone, Copy)]
pub struct StatisticsEngine<'a> {
    snapshot: &'a Snapshot,
    as_of: DateTime<Utc>,
}

impl<'a> StatisticsEngine<'a> {
    pub fn new(snapshot: &'a Snapshot, as_of: DateTime<Utc>) -> Self {
        Self { snapshot, as_of }
    }

    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    /// Statistics of `scope` over the last `lookback_days` days.
    pub fn stats(&self, scope: StatsScope, lookback_days: u32) -> HistoricalStats {
        let cutoff = days_before(self.as_of, u64::from(lookback_days));
        let recent = |r: &&ReservationRecord| r.start >= cutoff;

        match scope {
            StatsScope::Device(id) => {
                HistoricalStats::aggregate(scope, self.snapshot.reservations_of(id).iter().filter(recent))
            }
            StatsScope::Type(device_type) => HistoricalStats::aggregate(
                scope,
                self.snapshot
                    .devices()
                    .iter()
                    .filter(|d| d.device_type == device_type)
                    .flat_map(|d| self.snapshot.reservations_of(d.id))
                    .filter(recent),
            ),
        }
    }

    pub fn device_stats(&self, id: DeviceId, lookback_days: u32) -> HistoricalStats {
        self.stats(StatsScope::Device(id), lookback_days)
    }

    pub fn type_stats(&self, device_type: DeviceType, lookback_days: u32) -> HistoricalStats {
        self.stats(StatsScope::Type(device_type), lookback_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::PhysicalDevice;
    use chrono::{Duration, TimeZone};

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    fn booking(device: DeviceId, days_ago: i64, hours: i64, status: ReservationStatus) -> ReservationRecord {
        let start = as_of() - Duration::days(days_ago);
        ReservationRecord::new(device, start, start + Duration::hours(hours), status)
    }

    /// Device 1: 8 confirmed, 1 conflicting, 1 cancelled in the last 90 days,
    /// plus one confirmed booking too old to count.
    fn snapshot() -> Snapshot {
        let mut reservations: Vec<ReservationRecord> = (0..8)
            .map(|i| booking(1, 10 + i, 4, ReservationStatus::Confirmed))
            .collect();
        reservations.push(booking(1, 20, 4, ReservationStatus::Conflicting));
        reservations.push(booking(1, 30, 4, ReservationStatus::Cancelled));
        reservations.push(booking(1, 120, 4, ReservationStatus::Confirmed));
        reservations.push(booking(2, 5, 10, ReservationStatus::Rejected));
        reservations.push(booking(3, 5, 10, ReservationStatus::Confirmed));

        Snapshot::new(
            vec![
                PhysicalDevice::new(1, DeviceType::Roadm, "roadm-1"),
                PhysicalDevice::new(2, DeviceType::Roadm, "roadm-2"),
                PhysicalDevice::new(3, DeviceType::Fiber, "fiber-3"),
            ],
            reservations,
        )
    }

    #[test]
    fn test_device_reliability() {
        let snap = snapshot();
        let stats = StatisticsEngine::new(&snap, as_of()).device_stats(1, 90);

        assert_eq!(stats.total_bookings, 10);
        assert_eq!(stats.success_rate, 0.8);
        assert_eq!(stats.conflict_rate, 0.1);
        assert_eq!(stats.cancellation_rate, 0.1);
        assert!((stats.reliability_score - 0.76).abs() < 1e-9);
        assert!((stats.avg_duration_hours.value() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_lookback_excludes_old_bookings() {
        let snap = snapshot();
        let engine = StatisticsEngine::new(&snap, as_of());
        assert_eq!(engine.device_stats(1, 365).total_bookings, 11);
        assert_eq!(engine.device_stats(1, 15).total_bookings, 6);
    }

    #[test]
    fn test_type_scope_joins_devices() {
        let snap = snapshot();
        let stats = StatisticsEngine::new(&snap, as_of()).type_stats(DeviceType::Roadm, 90);
        assert_eq!(stats.total_bookings, 11);
        assert_eq!(stats.scope, StatsScope::Type(DeviceType::Roadm));
    }

    #[test]
    fn test_no_history_is_neutral() {
        let snap = snapshot();
        let engine = StatisticsEngine::new(&snap, as_of());
        let stats = engine.device_stats(42, 90);
        assert!(!stats.has_history());
        assert_eq!(stats.reliability_score, 0.5);
        assert_eq!(stats.success_rate, 0.0);
        assert_eq!(engine.type_stats(DeviceType::Otdr, 90).reliability_score, 0.5);
    }

    #[test]
    fn test_invalid_durations_are_skipped() {
        let start = as_of();
        let records = [
            ReservationRecord::new(1, start, start + Duration::hours(6), ReservationStatus::Confirmed),
            ReservationRecord::new(1, start, start, ReservationStatus::Confirmed),
        ];
        let stats = HistoricalStats::aggregate(StatsScope::Device(1), &records);
        assert_eq!(stats.total_bookings, 2);
        assert!((stats.avg_duration_hours.value() - 6.0).abs() < 1e-9);
    }
}
