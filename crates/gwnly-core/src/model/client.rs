// ── Client domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A wireless client, joined with the AP it is associated with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Natural key (vendor `clientId`).
    pub mac: String,
    /// `"Unknown"` when the vendor sends none.
    pub name: String,
    pub ipv4: String,
    pub ipv6: String,
    /// MAC of the associated AP (vendor `apId`); empty when unknown.
    pub ap_mac: String,
    /// Resolved against the AP list of the same snapshot.
    pub ap_name: String,
    /// Signal strength in dBm.
    pub rssi: i64,
    pub ssid: String,
    pub online: bool,
    pub tx_bytes: u64,
    pub rx_bytes: u64,
    pub tx_rate: u64,
    pub rx_rate: u64,
    /// Band label such as `5G`.
    pub channel_class: Option<String>,
    pub vlan_id: Option<i64>,
    pub last_active: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl Client {
    /// Whole seconds since the client was last active, clamped at zero.
    pub fn seconds_since_active(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_active
            .map(|seen| (now - seen).num_seconds().max(0))
    }
}
