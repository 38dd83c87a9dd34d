use thiserror::Error;

use crate::inventory::StoreError;

/// Errors returned by [`TopologyEngine`](crate::TopologyEngine) operations.
///
/// Infeasible topologies, degenerate windows and missing history are not errors:
/// they produce empty or neutral results.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("Failed to read inventory: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let e: EngineError = StoreError::Unavailable("connection refused".to_string()).into();
        assert_eq!(
            e.to_string(),
            "Failed to read inventory: Inventory store unavailable: connection refused"
        );
    }

    #[test]
    fn invalid_config_display() {
        let e = EngineError::InvalidConfig("bad".to_string());
        assert_eq!(e.to_string(), "Invalid engine configuration: bad");
    }
}
