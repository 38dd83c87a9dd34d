//! Logical topology input and mapping output types.

mod logical;
mod mapping;

pub use logical::{LogicalEdge, LogicalNode, NodeParameters};
pub use mapping::{
    weighted_total, Candidate, Confidence, LinkMapping, LinkResolution, NodeMapping,
    TopologyMapping,
};
