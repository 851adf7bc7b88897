// GWN open API response types
//
// List endpoints wrap their payload as `{ "data": { "result": [...] } }`.
// Field presence varies between firmware versions and cloud regions, so
// every field is optional and parsed leniently; anything we do not model
// lands in `extra`.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::lenient;

// ── Envelope ─────────────────────────────────────────────────────────

/// Extract `data.result` from a list envelope.
///
/// A missing or `null` `data` / `result` is an empty list, not an error.
pub fn result_list<T: DeserializeOwned>(envelope: &Value) -> Result<Vec<T>, Error> {
    let items = match envelope.get("data").and_then(|d| d.get("result")) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(Error::Deserialization {
                message: "`data.result` is not a list".into(),
                body: other.to_string(),
            });
        }
    };

    items
        .iter()
        .map(|item| {
            T::deserialize(item).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: item.to_string(),
            })
        })
        .collect()
}

// ── Network ──────────────────────────────────────────────────────────

/// Vendor network identifier.
///
/// Usually numeric, occasionally a string; echoed back to the API with the
/// JSON type it arrived with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NetworkId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for NetworkId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.trim()
            .parse::<i64>()
            .map_or_else(|_| Self::Text(s.to_owned()), Self::Numeric))
    }
}

impl From<i64> for NetworkId {
    fn from(n: i64) -> Self {
        Self::Numeric(n)
    }
}

/// Entry from `network/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNetwork {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NetworkId>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Access point ─────────────────────────────────────────────────────

/// Entry from `ap/list`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAccessPoint {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub mac: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    /// Online when truthy.
    #[serde(default, deserialize_with = "lenient::opt_flag")]
    pub status: Option<bool>,
    /// Seconds since boot.
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub up_time: Option<u64>,
    /// Connected client count.
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub clients: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub usage: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub upload: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub download: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub version_firmware: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub ipv4: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub ipv6: Option<String>,
    /// Hardware model, e.g. `GWN7660`.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub ap_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Entry from `client/list`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClient {
    /// Client MAC address.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub client_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub ipv4: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub ipv6: Option<String>,
    /// MAC of the access point the client is associated with.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub ap_id: Option<String>,
    /// Vendor-resolved AP name; used when `ap_id` matches no listed AP.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub ap_name: Option<String>,
    /// Signal strength in dBm.
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub rssi: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub ssid: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_flag")]
    pub online: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub tx_bytes: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub rx_bytes: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub tx_rate: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub rx_rate: Option<u64>,
    /// Band label such as `2.4G` / `5G` / `6G`.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub channel_class_str: Option<String>,
    /// VLAN id.
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub vid: Option<i64>,
    /// ISO-8601 time of last activity.
    #[serde(
        default,
        rename = "lastactive",
        deserialize_with = "lenient::opt_string"
    )]
    pub last_active: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
