// ── Access point domain type ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A managed access point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessPoint {
    /// Natural key.
    pub mac: String,
    /// Display name; the MAC when the vendor sends none.
    pub name: String,
    pub online: bool,
    pub uptime_secs: u64,
    pub client_count: u64,
    pub usage_bytes: u64,
    pub upload_bytes: u64,
    pub download_bytes: u64,
    pub firmware: Option<String>,
    pub ipv4: Option<String>,
    pub ipv6: Option<String>,
    /// Hardware model (vendor `apType`).
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl AccessPoint {
    pub fn status_label(&self) -> &'static str {
        if self.online { "Online" } else { "Offline" }
    }
}
