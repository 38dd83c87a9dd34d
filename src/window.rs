//! Half-open booking window over UTC timestamps.

use std::fmt::Display;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use qtty::{Hour, Quantity, Second};

/// Time range `[start, end)` a topology is requested for.
///
/// Unlike a scheduling interval, a window with `end <= start` is representable:
/// it is treated as zero capacity by every operation instead of being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window starting at `start` and lasting `days` days.
    ///
    /// The end saturates at the representable range instead of overflowing.
    pub fn from_days(start: DateTime<Utc>, days: i64) -> Self {
        let end = if days >= 0 {
            days_after(start, days.unsigned_abs())
        } else {
            days_before(start, days.unsigned_abs())
        };
        Self::new(start, end)
    }

    /// Window from `start` to the end of representable time.
    pub fn open_ended(start: DateTime<Utc>) -> Self {
        Self::new(start, DateTime::<Utc>::MAX_UTC)
    }

    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// True when `end <= start`.
    pub fn is_degenerate(&self) -> bool {
        self.end <= self.start
    }

    /// Length of the window. Zero for degenerate windows.
    pub fn duration(&self) -> Duration {
        if self.is_degenerate() {
            Duration::zero()
        } else {
            self.end - self.start
        }
    }

    /// Length of the window in hours.
    pub fn hours(&self) -> Quantity<Hour> {
        hours_between(self.start, self.end).unwrap_or(Quantity::new(0.0))
    }

    /// Half-open overlap test: `self.start < other.end && self.end > other.start`.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Returns true if `other` lies entirely inside this window.
    pub fn encloses(&self, other: &TimeWindow) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Calendar dates touched by the window, first to last, inclusive.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.start.date_naive();
        let last = self.end.date_naive().max(first);
        first.iter_days().take_while(move |d| *d <= last)
    }

    /// Whole calendar days between the start and end dates.
    pub fn calendar_days(&self) -> i64 {
        (self.end.date_naive() - self.start.date_naive()).num_days()
    }

    /// Smallest window covering both.
    pub fn union(&self, other: &TimeWindow) -> TimeWindow {
        TimeWindow::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// `at` moved `days` days back, saturating at [`DateTime::<Utc>::MIN_UTC`].
pub fn days_before(at: DateTime<Utc>, days: u64) -> DateTime<Utc> {
    day_span(days)
        .and_then(|d| at.checked_sub_signed(d))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// `at` moved `days` days forward, saturating at [`DateTime::<Utc>::MAX_UTC`].
pub fn days_after(at: DateTime<Utc>, days: u64) -> DateTime<Utc> {
    day_span(days)
        .and_then(|d| at.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn day_span(days: u64) -> Option<Duration> {
    i64::try_from(days).ok().and_then(Duration::try_days)
}

/// Elapsed hours from `start` to `end`, or `None` when `end <= start`.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Quantity<Hour>> {
    if end <= start {
        return None;
    }
    let seconds = (end - start).num_milliseconds() as f64 / 1000.0;
    Some(Quantity::<Second>::new(seconds).to::<Hour>())
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}
