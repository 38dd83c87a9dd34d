//! Physical inventory device records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use super::error::ParseError;
use crate::window::TimeWindow;
use crate::DeviceId;

/// Kind of lab equipment.
///
/// `Router` and `Other` have no entry in the compatibility table, so devices of
/// those kinds become isolated nodes of the physical graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DeviceType {
    Roadm,
    Fiber,
    Ila,
    Transceiver,
    Switch,
    Otdr,
    Router,
    /// Any inventory type this crate has no name for.
    Other,
}

impl DeviceType {
    pub const ALL: [DeviceType; 8] = [
        DeviceType::Roadm,
        DeviceType::Fiber,
        DeviceType::Ila,
        DeviceType::Transceiver,
        DeviceType::Switch,
        DeviceType::Otdr,
        DeviceType::Router,
        DeviceType::Other,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Roadm => "ROADM",
            DeviceType::Fiber => "Fiber",
            DeviceType::Ila => "ILA",
            DeviceType::Transceiver => "Transceiver",
            DeviceType::Switch => "Switch",
            DeviceType::Otdr => "OTDR",
            DeviceType::Router => "Router",
            DeviceType::Other => "Other",
        }
    }

    /// Lenient translation of an inventory type name.
    ///
    /// Accepts everything [`FromStr`] does and maps any other name to
    /// [`DeviceType::Other`], so one odd row never fails a whole store read.
    pub fn from_inventory_name(name: &str) -> Self {
        name.parse().unwrap_or(DeviceType::Other)
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = ParseError;

    /// Case-insensitive, surrounding whitespace ignored. Plural inventory names
    /// such as `Transceivers` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let singular = trimmed
            .strip_suffix('s')
            .or_else(|| trimmed.strip_suffix('S'))
            .unwrap_or(trimmed);
        DeviceType::ALL
            .into_iter()
            .find(|t| {
                t.as_str().eq_ignore_ascii_case(trimmed) || t.as_str().eq_ignore_ascii_case(singular)
            })
            .ok_or_else(|| ParseError::UnknownDeviceType(s.to_string()))
    }
}

/// Operational status recorded in the inventory.
///
/// The lowercase inventory statuses (`active`, `in_maintenance`, `retired`, `spare`,
/// `planned`) and the scheduler statuses (`available`, `maintenance`, `unavailable`,
/// ...) both appear in real rows. `in_maintenance` behaves as `maintenance` and
/// `retired` as `unavailable`. `spare` and `planned` do not block booking on their
/// own; reservations and maintenance markers still apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DeviceStatus {
    Available,
    Active,
    Reserved,
    Maintenance,
    InMaintenance,
    Unavailable,
    Retired,
    Broken,
    Spare,
    Planned,
}

impl DeviceStatus {
    const ALL: [DeviceStatus; 10] = [
        DeviceStatus::Available,
        DeviceStatus::Active,
        DeviceStatus::Reserved,
        DeviceStatus::Maintenance,
        DeviceStatus::InMaintenance,
        DeviceStatus::Unavailable,
        DeviceStatus::Retired,
        DeviceStatus::Broken,
        DeviceStatus::Spare,
        DeviceStatus::Planned,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Available => "available",
            DeviceStatus::Active => "active",
            DeviceStatus::Reserved => "reserved",
            DeviceStatus::Maintenance => "maintenance",
            DeviceStatus::InMaintenance => "in_maintenance",
            DeviceStatus::Unavailable => "unavailable",
            DeviceStatus::Retired => "retired",
            DeviceStatus::Broken => "broken",
            DeviceStatus::Spare => "spare",
            DeviceStatus::Planned => "planned",
        }
    }

    pub const fn is_maintenance(&self) -> bool {
        matches!(self, DeviceStatus::Maintenance | DeviceStatus::InMaintenance)
    }

    /// Statuses that take a device out of the bookable pool regardless of reservations.
    pub const fn blocks_booking(&self) -> bool {
        self.is_maintenance()
            || matches!(
                self,
                DeviceStatus::Unavailable | DeviceStatus::Retired | DeviceStatus::Broken
            )
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        DeviceStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseError::UnknownDeviceStatus(s.to_string()))
    }
}

/// Patch-panel ports of a device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DevicePorts {
    pub in_port: Option<String>,
    pub out_port: Option<String>,
}

/// Maintenance window as stored by the inventory: `"<label>/<YYYY-MM-DD>"` markers.
///
/// The raw strings are kept as-is. [`MaintenanceWindow::date_range`] parses them lazily
/// and fails open: anything unparsable means "no maintenance".
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaintenanceWindow {
    pub start: String,
    pub end: String,
}

impl MaintenanceWindow {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Parsed `(start, end)` at midnight UTC of each marker date.
    pub fn date_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = parse_marker(&self.start)?;
        let end = parse_marker(&self.end)?;
        Some((start, end))
    }

    /// Returns true if the parsed range touches `window`.
    ///
    /// Both marker dates are closed bounds. Unparsable markers never overlap.
    pub fn overlaps(&self, window: &TimeWindow) -> bool {
        match self.date_range() {
            Some((start, end)) => !(end < window.start() || start > window.end()),
            None => false,
        }
    }
}

fn parse_marker(raw: &str) -> Option<DateTime<Utc>> {
    let date_part = raw.rsplit('/').next()?.trim();
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// A device from the lab inventory. Read-only to this crate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicalDevice {
    pub id: DeviceId,
    pub device_type: DeviceType,
    pub name: String,
    pub status: DeviceStatus,
    pub ip_address: Option<String>,
    pub ports: DevicePorts,
    pub maintenance: Vec<MaintenanceWindow>,
}

impl PhysicalDevice {
    /// Creates an available device with no ports or maintenance.
    pub fn new(id: DeviceId, device_type: DeviceType, name: impl Into<String>) -> Self {
        Self {
            id,
            device_type,
            name: name.into(),
            status: DeviceStatus::Available,
            ip_address: None,
            ports: DevicePorts::default(),
            maintenance: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: DeviceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    pub fn with_ports(mut self, in_port: impl Into<String>, out_port: impl Into<String>) -> Self {
        self.ports = DevicePorts {
            in_port: Some(in_port.into()),
            out_port: Some(out_port.into()),
        };
        self
    }

    pub fn with_maintenance(mut self, window: MaintenanceWindow) -> Self {
        self.maintenance.push(window);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_device_type_parse_is_case_insensitive() {
        assert_eq!("roadm".parse::<DeviceType>().unwrap(), DeviceType::Roadm);
        assert_eq!(" FIBER ".parse::<DeviceType>().unwrap(), DeviceType::Fiber);
        assert_eq!("Otdr".parse::<DeviceType>().unwrap(), DeviceType::Otdr);
        assert!(matches!(
            "laser".parse::<DeviceType>(),
            Err(ParseError::UnknownDeviceType(_))
        ));
    }

    #[test]
    fn test_device_status_parse() {
        assert_eq!(
            "MAINTENANCE".parse::<DeviceStatus>().unwrap(),
            DeviceStatus::Maintenance
        );
        assert!("decommissioned".parse::<DeviceStatus>().is_err());
        assert!(DeviceStatus::Broken.blocks_booking());
        assert!(!DeviceStatus::Active.blocks_booking());
    }

    #[test]
    fn test_inventory_statuses() {
        let parsed: Vec<DeviceStatus> = ["active", "in_maintenance", "retired", "spare", "planned"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(
            parsed,
            vec![
                DeviceStatus::Active,
                DeviceStatus::InMaintenance,
                DeviceStatus::Retired,
                DeviceStatus::Spare,
                DeviceStatus::Planned,
            ]
        );
        assert!(DeviceStatus::InMaintenance.is_maintenance());
        assert!(DeviceStatus::InMaintenance.blocks_booking());
        assert!(DeviceStatus::Retired.blocks_booking());
        assert!(!DeviceStatus::Retired.is_maintenance());
        assert!(!DeviceStatus::Spare.blocks_booking());
        assert!(!DeviceStatus::Planned.blocks_booking());
    }

    #[test]
    fn test_inventory_type_names() {
        assert_eq!("Router".parse::<DeviceType>().unwrap(), DeviceType::Router);
        assert_eq!("Transceivers".parse::<DeviceType>().unwrap(), DeviceType::Transceiver);
        assert_eq!("ROADMS".parse::<DeviceType>().unwrap(), DeviceType::Roadm);
        assert_eq!("ila".parse::<DeviceType>().unwrap(), DeviceType::Ila);
        assert!("Patch panel".parse::<DeviceType>().is_err());

        assert_eq!(DeviceType::from_inventory_name("Patch panel"), DeviceType::Other);
        assert_eq!(DeviceType::from_inventory_name(" fiber "), DeviceType::Fiber);
    }

    #[test]
    fn test_maintenance_marker_parsing() {
        let m = MaintenanceWindow::new("Maintenance/2025-03-22", "Maintenance/2025-03-24");
        let (start, end) = m.date_range().unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 22, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 3, 24, 0, 0, 0).unwrap());

        let bare = MaintenanceWindow::new("2025-03-22", "2025-03-23");
        assert!(bare.date_range().is_some());
    }

    #[test]
    fn test_malformed_maintenance_fails_open() {
        let m = MaintenanceWindow::new("Maintenance/next week", "Maintenance/??");
        assert!(m.date_range().is_none());
        let window = TimeWindow::new(
            Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
        );
        assert!(!m.overlaps(&window));
    }

    #[test]
    fn test_maintenance_overlap() {
        let m = MaintenanceWindow::new("Maintenance/2025-03-22", "Maintenance/2025-03-24");
        let inside = TimeWindow::new(
            Utc.with_ymd_and_hms(2025, 3, 23, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 23, 18, 0, 0).unwrap(),
        );
        let after = TimeWindow::new(
            Utc.with_ymd_and_hms(2025, 3, 24, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 25, 8, 0, 0).unwrap(),
        );
        assert!(m.overlaps(&inside));
        assert!(!m.overlaps(&after));
    }
}
