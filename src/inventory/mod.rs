//! Inventory records and the store they are read from.
//!
//! Devices and reservations are owned by the booking platform. This crate only reads
//! them, through the [`InventoryStore`] trait, and never writes anything back.

mod device;
mod error;
mod reservation;
mod store;

pub use device::{DevicePorts, DeviceStatus, DeviceType, MaintenanceWindow, PhysicalDevice};
pub use error::{ParseError, StoreError};
pub use reservation::{ReservationRecord, ReservationStatus};
pub use store::{InMemoryStore, InventoryStore, Snapshot};
