//! Read-only seam to the inventory/booking backend.

use std::collections::HashMap;

use super::device::PhysicalDevice;
use super::error::StoreError;
use super::reservation::ReservationRecord;
use crate::window::TimeWindow;
use crate::DeviceId;

/// Source of devices and reservations.
///
/// Implementations adapt whatever the booking platform stores (SQL rows, legacy
/// field names, free-form status strings) into the typed records of this crate.
/// Translation of legacy formats belongs here, not in the engine.
pub trait InventoryStore: Send + Sync {
    /// All inventory devices.
    fn list_devices(&self) -> Result<Vec<PhysicalDevice>, StoreError>;

    /// Reservations of any status whose `[start, end)` overlaps `range`.
    ///
    /// When `device_ids` is `Some`, only reservations of those devices are returned.
    fn list_reservations(
        &self,
        device_ids: Option<&[DeviceId]>,
        range: TimeWindow,
    ) -> Result<Vec<ReservationRecord>, StoreError>;
}

/// Store backed by plain vectors.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    devices: Vec<PhysicalDevice>,
    reservations: Vec<ReservationRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(mut self, device: PhysicalDevice) -> Self {
        self.devices.push(device);
        self
    }

    pub fn with_reservation(mut self, reservation: ReservationRecord) -> Self {
        self.reservations.push(reservation);
        self
    }

    pub fn add_device(&mut self, device: PhysicalDevice) {
        self.devices.push(device);
    }

    pub fn add_reservation(&mut self, reservation: ReservationRecord) {
        self.reservations.push(reservation);
    }
}

impl InventoryStore for InMemoryStore {
    fn list_devices(&self) -> Result<Vec<PhysicalDevice>, StoreError> {
        Ok(self.devices.clone())
    }

    fn list_reservations(
        &self,
        device_ids: Option<&[DeviceId]>,
        range: TimeWindow,
    ) -> Result<Vec<ReservationRecord>, StoreError> {
        Ok(self
            .reservations
            .iter()
            .filter(|r| device_ids.map_or(true, |ids| ids.contains(&r.device_id)))
            .filter(|r| r.window().overlaps(&range))
            .cloned()
            .collect())
    }
}

/// Devices and reservations read once for a single engine call.
///
/// Every computation of a call works from the same snapshot so results reflect one
/// consistent view of the store.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    devices: Vec<PhysicalDevice>,
    reservations_by_device: HashMap<DeviceId, Vec<ReservationRecord>>,
}

impl Snapshot {
    /// Builds a snapshot; devices are ordered by id.
    pub fn new(mut devices: Vec<PhysicalDevice>, reservations: Vec<ReservationRecord>) -> Self {
        devices.sort_by_key(|d| d.id);
        let mut reservations_by_device: HashMap<DeviceId, Vec<ReservationRecord>> = HashMap::new();
        for r in reservations {
            reservations_by_device.entry(r.device_id).or_default().push(r);
        }
        for list in reservations_by_device.values_mut() {
            list.sort_by_key(|r| (r.start, r.end));
        }
        Self {
            devices,
            reservations_by_device,
        }
    }

    /// Reads devices and reservations overlapping `range` from `store`.
    pub fn fetch<S: InventoryStore + ?Sized>(
        store: &S,
        device_ids: Option<&[DeviceId]>,
        range: TimeWindow,
    ) -> Result<Self, StoreError> {
        let devices = store.list_devices()?;
        let reservations = store.list_reservations(device_ids, range)?;
        Ok(Self::new(devices, reservations))
    }

    pub fn devices(&self) -> &[PhysicalDevice] {
        &self.devices
    }

    pub fn device(&self, id: DeviceId) -> Option<&PhysicalDevice> {
        self.devices
            .binary_search_by_key(&id, |d| d.id)
            .ok()
            .map(|idx| &self.devices[idx])
    }

    /// Reservations of one device, sorted by `(start, end)`.
    pub fn reservations_of(&self, id: DeviceId) -> &[ReservationRecord] {
        self.reservations_by_device
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All reservations, in device id order.
    pub fn reservations(&self) -> impl Iterator<Item = &ReservationRecord> {
        self.devices
            .iter()
            .flat_map(move |d| self.reservations_of(d.id).iter())
    }
}
