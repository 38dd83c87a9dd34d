use thiserror::Error;

/// Failures raised while translating store vocabulary into typed records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown device type: {0}")]
    UnknownDeviceType(String),

    #[error("Unknown device status: {0}")]
    UnknownDeviceStatus(String),

    #[error("Unknown reservation status: {0}")]
    UnknownReservationStatus(String),
}

/// Failures reported by an inventory/reservation backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Inventory store unavailable: {0}")]
    Unavailable(String),

    #[error("Inventory store backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
