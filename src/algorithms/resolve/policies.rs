//! The three mapping strategies.

use crate::algorithms::{PolicyContext, PolicyScore, ScoringPolicy};
use crate::topology::Candidate;

/// Score lost per earlier assignment of the same device (balanced distribution).
pub const REUSE_PENALTY: f64 = 0.1;

/// Score gained per mapped logical neighbor physically adjacent to the candidate.
pub const CONNECTION_BONUS: f64 = 0.1;

/// Best matcher score, preferring devices not used yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyBestFit;

impl ScoringPolicy for GreedyBestFit {
    fn name(&self) -> &'static str {
        "greedy-best-fit"
    }

    fn notes(&self) -> &'static str {
        "Greedy best-fit mapping. All nodes matched to best available devices."
    }

    fn excludes_used(&self) -> bool {
        true
    }

    fn score(&self, candidate: &Candidate, _ctx: &PolicyContext<'_>) -> PolicyScore {
        PolicyScore {
            rank: candidate.fit_score,
            fit: candidate.fit_score,
        }
    }
}

/// Ranks every candidate with a penalty per earlier use of the device.
///
/// The recorded fit score stays the matcher's score.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalancedDistribution;

impl ScoringPolicy for BalancedDistribution {
    fn name(&self) -> &'static str {
        "balanced-distribution"
    }

    fn notes(&self) -> &'static str {
        "Balanced distribution mapping. Tries to use different devices when possible."
    }

    fn excludes_used(&self) -> bool {
        false
    }

    fn score(&self, candidate: &Candidate, ctx: &PolicyContext<'_>) -> PolicyScore {
        let used = ctx.times_used(candidate.device_id) as f64;
        PolicyScore {
            rank: candidate.fit_score - REUSE_PENALTY * used,
            fit: candidate.fit_score,
        }
    }
}

/// Boosts candidates physically adjacent to the devices of already mapped neighbors.
///
/// Only neighbors assigned earlier in the walk count, so the bonus depends on the
/// order of the logical nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionOptimized;

impl ScoringPolicy for ConnectionOptimized {
    fn name(&self) -> &'static str {
        "connection-optimized"
    }

    fn notes(&self) -> &'static str {
        "Connection-optimized mapping. Prefers physically connected devices."
    }

    fn excludes_used(&self) -> bool {
        true
    }

    fn score(&self, candidate: &Candidate, ctx: &PolicyContext<'_>) -> PolicyScore {
        let connected = ctx
            .mapped_neighbors
            .iter()
            .filter(|&&n| ctx.graph.has_edge(candidate.device_id, n))
            .count();
        let boosted = (candidate.fit_score + CONNECTION_BONUS * connected as f64).min(1.0);
        PolicyScore {
            rank: boosted,
            fit: boosted,
        }
    }
}

/// Strategies in the order they are run.
pub fn default_policies() -> Vec<Box<dyn ScoringPolicy>> {
    vec![
        Box::new(GreedyBestFit),
        Box::new(BalancedDistribution),
        Box::new(ConnectionOptimized),
    ]
}
