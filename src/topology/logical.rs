//! Caller-supplied logical topology.

use crate::inventory::DeviceType;
use crate::Id;

/// Informational parameters of a logical node.
///
/// Recorded in match explanations but not scored: the inventory carries no vendor,
/// port count, span length or gain to compare against.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeParameters {
    pub vendor: Option<String>,
    pub ports: Option<u32>,
    pub length_km: Option<f64>,
    pub gain_db: Option<f64>,
}

impl NodeParameters {
    pub fn is_empty(&self) -> bool {
        self.vendor.is_none()
            && self.ports.is_none()
            && self.length_km.is_none()
            && self.gain_db.is_none()
    }
}

/// A device role in the diagram to realize.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogicalNode {
    pub id: Id,
    pub device_type: DeviceType,
    pub parameters: NodeParameters,
}

impl LogicalNode {
    pub fn new(id: impl Into<Id>, device_type: DeviceType) -> Self {
        Self {
            id: id.into(),
            device_type,
            parameters: NodeParameters::default(),
        }
    }

    pub fn with_parameters(mut self, parameters: NodeParameters) -> Self {
        self.parameters = parameters;
        self
    }
}

/// A connection between two logical nodes. Direction is not significant.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogicalEdge {
    pub id: Option<Id>,
    pub source: Id,
    pub target: Id,
}

impl LogicalEdge {
    pub fn new(source: impl Into<Id>, target: impl Into<Id>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Explicit id, or `"<source>-<target>"`.
    pub fn effective_id(&self) -> Id {
        self.id
            .clone()
            .unwrap_or_else(|| format!("{}-{}", self.source, self.target))
    }

    /// The other endpoint if `node` is one of them.
    pub fn opposite(&self, node: &str) -> Option<&str> {
        if self.source == node {
            Some(&self.target)
        } else if self.target == node {
            Some(&self.source)
        } else {
            None
        }
    }
}
