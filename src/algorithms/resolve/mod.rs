//! Logical-to-physical topology resolution.
//!
//! Every strategy runs the same walk over the logical nodes, in input order:
//!
//! 1. **Pool**: available devices of the node's type, optionally restricted to
//!    devices the walk has not used yet (falling back to the whole pool)
//! 2. **Match**: the [`matcher`] scores and orders the pool
//! 3. **Score**: the strategy's [`ScoringPolicy`](super::ScoringPolicy) re-ranks the
//!    matches from the allocation state (reuse counts, already mapped neighbors)
//! 4. **Pick**: the top candidate is assigned; the next three become alternatives
//!
//! Once every node is assigned, the [`links`] resolver realizes the logical edges and
//! the mapping total is `0.7 × mean(node scores) + 0.3 × mean(link scores)`. A node
//! with an empty pool makes the strategy infeasible.
//!
//! # Module Structure
//!
//! - [`matcher`] - Candidate fit scores and explanations
//! - [`ordering`] - Candidate comparison with deterministic tie-breaking
//! - [`policies`] - The greedy, balanced and connection-optimized policies
//! - [`links`] - Logical edge resolution over the physical graph
//! - [`engine`] - The shared allocation walk

pub mod engine;
pub mod links;
pub mod matcher;
pub mod ordering;
pub mod policies;

pub use engine::{allocate, run_strategies, AllocationInput};
pub use links::resolve_links;
pub use matcher::match_node;
pub use policies::{default_policies, BalancedDistribution, ConnectionOptimized, GreedyBestFit};
