// ── Sensor table ──
//
// One descriptor per exposed metric, evaluated against a snapshot. The
// registry remembers every device it has seen so a device missing from a
// later snapshot reports its sensors as unavailable instead of vanishing.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::convert::UNKNOWN;
use crate::model::{AccessPoint, Client, Snapshot};

pub const MANUFACTURER: &str = "Grandstream";
const DEFAULT_AP_MODEL: &str = "GWN AP";
const CLIENT_MODEL: &str = "Network Client";
const VLAN_UNASSIGNED: &str = "Not assigned";

// ── Descriptor vocabulary ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    #[serde(rename = "B")]
    Bytes,
    #[serde(rename = "s")]
    Seconds,
    #[serde(rename = "dBm")]
    Dbm,
    #[serde(rename = "kbit/s")]
    KilobitsPerSecond,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Bytes => "B",
            Self::Seconds => "s",
            Self::Dbm => "dBm",
            Self::KilobitsPerSecond => "kbit/s",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    DataSize,
    SignalStrength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Measurement,
    TotalIncreasing,
}

/// A sensor state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SensorValue {
    Text(String),
    Int(i64),
    Count(u64),
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Count(n) => write!(f, "{n}"),
        }
    }
}

fn text(s: &str) -> Option<SensorValue> {
    Some(SensorValue::Text(s.to_owned()))
}

fn text_or_unknown(s: Option<&str>) -> Option<SensorValue> {
    text(s.filter(|s| !s.is_empty()).unwrap_or(UNKNOWN))
}

fn online_label(online: bool) -> Option<SensorValue> {
    text(if online { "Online" } else { "Offline" })
}

/// Static description of one metric for entities of type `T`.
pub struct SensorDescriptor<T> {
    /// Unique-id suffix; the full id is `{mac}_{key}`.
    pub key: &'static str,
    pub name: &'static str,
    pub unit: Option<Unit>,
    pub device_class: Option<DeviceClass>,
    pub state_class: Option<StateClass>,
    pub value: fn(&T, DateTime<Utc>) -> Option<SensorValue>,
}

impl<T> fmt::Debug for SensorDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorDescriptor")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("unit", &self.unit)
            .finish_non_exhaustive()
    }
}

// ── Tables ─────────────────────────────────────────────────────────

pub const AP_SENSORS: &[SensorDescriptor<AccessPoint>] = &[
    SensorDescriptor {
        key: "status",
        name: "Status",
        unit: None,
        device_class: None,
        state_class: None,
        value: |ap, _| online_label(ap.online),
    },
    SensorDescriptor {
        key: "uptime",
        name: "Uptime",
        unit: Some(Unit::Seconds),
        device_class: None,
        state_class: Some(StateClass::Measurement),
        value: |ap, _| Some(SensorValue::Count(ap.uptime_secs)),
    },
    SensorDescriptor {
        key: "clients_count",
        name: "Connected Clients",
        unit: None,
        device_class: None,
        state_class: Some(StateClass::Measurement),
        value: |ap, _| Some(SensorValue::Count(ap.client_count)),
    },
    SensorDescriptor {
        key: "usage",
        name: "Total Usage",
        unit: Some(Unit::Bytes),
        device_class: Some(DeviceClass::DataSize),
        state_class: Some(StateClass::TotalIncreasing),
        value: |ap, _| Some(SensorValue::Count(ap.usage_bytes)),
    },
    SensorDescriptor {
        key: "upload",
        name: "Upload",
        unit: Some(Unit::Bytes),
        device_class: Some(DeviceClass::DataSize),
        state_class: Some(StateClass::TotalIncreasing),
        value: |ap, _| Some(SensorValue::Count(ap.upload_bytes)),
    },
    SensorDescriptor {
        key: "download",
        name: "Download",
        unit: Some(Unit::Bytes),
        device_class: Some(DeviceClass::DataSize),
        state_class: Some(StateClass::TotalIncreasing),
        value: |ap, _| Some(SensorValue::Count(ap.download_bytes)),
    },
    SensorDescriptor {
        key: "firmware",
        name: "Firmware Version",
        unit: None,
        device_class: None,
        state_class: None,
        value: |ap, _| text_or_unknown(ap.firmware.as_deref()),
    },
    SensorDescriptor {
        key: "ipv4",
        name: "IPv4 Address",
        unit: None,
        device_class: None,
        state_class: None,
        value: |ap, _| ap.ipv4.as_deref().and_then(text),
    },
    SensorDescriptor {
        key: "ipv6",
        name: "IPv6 Address",
        unit: None,
        device_class: None,
        state_class: None,
        value: |ap, _| ap.ipv6.as_deref().and_then(text),
    },
];

pub const CLIENT_SENSORS: &[SensorDescriptor<Client>] = &[
    SensorDescriptor {
        key: "rssi",
        name: "RSSI",
        unit: Some(Unit::Dbm),
        device_class: Some(DeviceClass::SignalStrength),
        state_class: Some(StateClass::Measurement),
        value: |c, _| Some(SensorValue::Int(c.rssi)),
    },
    SensorDescriptor {
        key: "ap",
        name: "Connected AP",
        unit: None,
        device_class: None,
        state_class: None,
        value: |c, _| text_or_unknown(Some(&c.ap_name)),
    },
    SensorDescriptor {
        key: "status",
        name: "Status",
        unit: None,
        device_class: None,
        state_class: None,
        value: |c, _| online_label(c.online),
    },
    SensorDescriptor {
        key: "ssid",
        name: "SSID",
        unit: None,
        device_class: None,
        state_class: None,
        value: |c, _| text_or_unknown(Some(&c.ssid)),
    },
    SensorDescriptor {
        key: "tx_bytes",
        name: "TX Bytes",
        unit: Some(Unit::Bytes),
        device_class: Some(DeviceClass::DataSize),
        state_class: Some(StateClass::TotalIncreasing),
        value: |c, _| Some(SensorValue::Count(c.tx_bytes)),
    },
    SensorDescriptor {
        key: "rx_bytes",
        name: "RX Bytes",
        unit: Some(Unit::Bytes),
        device_class: Some(DeviceClass::DataSize),
        state_class: Some(StateClass::TotalIncreasing),
        value: |c, _| Some(SensorValue::Count(c.rx_bytes)),
    },
    SensorDescriptor {
        key: "tx_rate",
        name: "TX Rate",
        unit: Some(Unit::KilobitsPerSecond),
        device_class: None,
        state_class: Some(StateClass::Measurement),
        value: |c, _| Some(SensorValue::Count(c.tx_rate)),
    },
    SensorDescriptor {
        key: "rx_rate",
        name: "RX Rate",
        unit: Some(Unit::KilobitsPerSecond),
        device_class: None,
        state_class: Some(StateClass::Measurement),
        value: |c, _| Some(SensorValue::Count(c.rx_rate)),
    },
    SensorDescriptor {
        key: "last_seen_seconds",
        name: "Last Seen",
        unit: Some(Unit::Seconds),
        device_class: None,
        state_class: Some(StateClass::Measurement),
        value: |c, now| c.seconds_since_active(now).map(SensorValue::Int),
    },
    SensorDescriptor {
        key: "ipv4",
        name: "IPv4 Address",
        unit: None,
        device_class: None,
        state_class: None,
        value: |c, _| text(&c.ipv4),
    },
    SensorDescriptor {
        key: "ipv6",
        name: "IPv6 Address",
        unit: None,
        device_class: None,
        state_class: None,
        value: |c, _| text(&c.ipv6),
    },
    SensorDescriptor {
        key: "channel_class",
        name: "Channel Class",
        unit: None,
        device_class: None,
        state_class: None,
        value: |c, _| text_or_unknown(c.channel_class.as_deref()),
    },
    SensorDescriptor {
        key: "vlan_id",
        name: "VLAN ID",
        unit: None,
        device_class: None,
        state_class: Some(StateClass::Measurement),
        value: |c, _| {
            Some(
                c.vlan_id
                    .map_or_else(|| SensorValue::Text(VLAN_UNASSIGNED.into()), SensorValue::Int),
            )
        },
    },
];

// ── Devices ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    AccessPoint,
    Client,
}

/// Device a group of sensors belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub kind: DeviceKind,
    /// The device MAC.
    pub id: String,
    pub name: String,
    pub manufacturer: &'static str,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_area: Option<String>,
    /// Parent device id (the AP a client hangs off).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via_device: Option<String>,
}

impl DeviceInfo {
    pub fn for_access_point(ap: &AccessPoint) -> Self {
        Self {
            kind: DeviceKind::AccessPoint,
            id: ap.mac.clone(),
            name: ap.name.clone(),
            manufacturer: MANUFACTURER,
            model: ap.model.clone().unwrap_or_else(|| DEFAULT_AP_MODEL.to_owned()),
            suggested_area: None,
            via_device: None,
        }
    }

    pub fn for_client(client: &Client) -> Self {
        Self {
            kind: DeviceKind::Client,
            id: client.mac.clone(),
            name: client.name.clone(),
            manufacturer: MANUFACTURER,
            model: CLIENT_MODEL.to_owned(),
            suggested_area: Some(client.ap_name.clone()),
            via_device: Some(client.ap_mac.clone()).filter(|mac| !mac.is_empty()),
        }
    }
}

// ── Readings ───────────────────────────────────────────────────────

/// One evaluated sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reading {
    pub unique_id: String,
    pub device_id: String,
    pub device_kind: DeviceKind,
    pub key: &'static str,
    pub name: &'static str,
    pub unit: Option<Unit>,
    pub device_class: Option<DeviceClass>,
    pub state_class: Option<StateClass>,
    pub available: bool,
    pub value: Option<SensorValue>,
}

impl Reading {
    fn evaluate<T>(
        device: &DeviceInfo,
        descriptor: &SensorDescriptor<T>,
        entity: Option<&T>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            unique_id: format!("{}_{}", device.id, descriptor.key),
            device_id: device.id.clone(),
            device_kind: device.kind,
            key: descriptor.key,
            name: descriptor.name,
            unit: descriptor.unit,
            device_class: descriptor.device_class,
            state_class: descriptor.state_class,
            available: entity.is_some(),
            value: entity.and_then(|e| (descriptor.value)(e, now)),
        }
    }
}

/// Devices discovered so far, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct SensorRegistry {
    devices: Vec<DeviceInfo>,
}

impl SensorRegistry {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut registry = Self::default();
        registry.extend_from(snapshot);
        registry
    }

    /// Register devices not seen before; returns how many were added.
    ///
    /// Entities without a MAC cannot be addressed and are skipped.
    pub fn extend_from(&mut self, snapshot: &Snapshot) -> usize {
        let before = self.devices.len();
        let discovered = snapshot
            .access_points
            .iter()
            .map(DeviceInfo::for_access_point)
            .chain(snapshot.clients.iter().map(DeviceInfo::for_client));
        for device in discovered {
            if device.id.is_empty() || self.device(device.kind, &device.id).is_some() {
                continue;
            }
            self.devices.push(device);
        }
        self.devices.len() - before
    }

    pub fn devices(&self) -> &[DeviceInfo] {
        &self.devices
    }

    pub fn device(&self, kind: DeviceKind, id: &str) -> Option<&DeviceInfo> {
        self.devices.iter().find(|d| d.kind == kind && d.id == id)
    }

    /// Evaluate every registered sensor against `snapshot`.
    pub fn evaluate(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> Vec<Reading> {
        let mut readings = Vec::new();
        for device in &self.devices {
            match device.kind {
                DeviceKind::AccessPoint => {
                    let ap = snapshot.access_points.iter().find(|ap| ap.mac == device.id);
                    readings.extend(
                        AP_SENSORS
                            .iter()
                            .map(|d| Reading::evaluate(device, d, ap, now)),
                    );
                }
                DeviceKind::Client => {
                    let client = snapshot.clients.iter().find(|c| c.mac == device.id);
                    readings.extend(
                        CLIENT_SENSORS
                            .iter()
                            .map(|d| Reading::evaluate(device, d, client, now)),
                    );
                }
            }
        }
        readings
    }
}

/// Evaluate the sensor table for every device in `snapshot`.
pub fn readings(snapshot: &Snapshot, now: DateTime<Utc>) -> Vec<Reading> {
    SensorRegistry::from_snapshot(snapshot).evaluate(snapshot, now)
}
