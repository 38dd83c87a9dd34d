//! Historical reservation statistics and the score adjustments derived from them.

mod adjust;
mod stats;

pub use adjust::{time_adjustment, Adjustment, ScoreAdjuster};
pub use stats::{HistoricalStats, StatisticsEngine, StatsScope, NEUTRAL_RELIABILITY};
