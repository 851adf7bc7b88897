// ── API-to-domain type conversions ──
//
// Turns raw `gwnly_api` rows into the canonical model. Named defaults live
// here: missing counters become 0, a missing client name becomes
// "Unknown", missing client addresses become empty strings.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};

use gwnly_api::{RawAccessPoint, RawClient};

use crate::model::{AccessPoint, Client};

/// Placeholder for names the vendor does not supply.
pub const UNKNOWN: &str = "Unknown";

// ── Helpers ────────────────────────────────────────────────────────

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

/// Parse an ISO-8601 `lastactive` value. Offset-less values are UTC.
pub(crate) fn parse_last_active(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

// ── Access points ──────────────────────────────────────────────────

/// MAC -> vendor-supplied name, for the client join.
///
/// Only APs with both a MAC and a non-empty name are indexed, so a named
/// AP wins over the client's own `apName` and an unnamed one does not.
pub(crate) fn ap_name_index(raw: &[RawAccessPoint]) -> HashMap<String, String> {
    raw.iter()
        .filter_map(|ap| {
            let mac = non_empty(ap.mac.clone())?;
            let name = non_empty(ap.name.clone())?;
            Some((mac, name))
        })
        .collect()
}

impl From<RawAccessPoint> for AccessPoint {
    fn from(raw: RawAccessPoint) -> Self {
        let mac = raw.mac.unwrap_or_default();
        let name = non_empty(raw.name).unwrap_or_else(|| mac.clone());
        Self {
            mac,
            name,
            online: raw.status.unwrap_or(false),
            uptime_secs: raw.up_time.unwrap_or(0),
            client_count: raw.clients.unwrap_or(0),
            usage_bytes: raw.usage.unwrap_or(0),
            upload_bytes: raw.upload.unwrap_or(0),
            download_bytes: raw.download.unwrap_or(0),
            firmware: non_empty(raw.version_firmware),
            ipv4: non_empty(raw.ipv4),
            ipv6: non_empty(raw.ipv6),
            model: non_empty(raw.ap_type),
            extra: raw.extra,
        }
    }
}

// ── Clients ────────────────────────────────────────────────────────

/// Normalize one client row and resolve its AP name.
///
/// AP name precedence: the listed AP's name, then the vendor's `apName`,
/// then "Unknown".
pub(crate) fn normalize_client(raw: RawClient, ap_names: &HashMap<String, String>) -> Client {
    let ap_mac = raw.ap_id.unwrap_or_default();
    let ap_name = ap_names
        .get(&ap_mac)
        .cloned()
        .or_else(|| non_empty(raw.ap_name))
        .unwrap_or_else(|| UNKNOWN.to_owned());
    let last_active = raw.last_active.as_deref().and_then(parse_last_active);

    Client {
        mac: raw.client_id.unwrap_or_default(),
        name: non_empty(raw.name).unwrap_or_else(|| UNKNOWN.to_owned()),
        ipv4: raw.ipv4.unwrap_or_default(),
        ipv6: raw.ipv6.unwrap_or_default(),
        ap_mac,
        ap_name,
        rssi: raw.rssi.unwrap_or(0),
        ssid: raw.ssid.unwrap_or_default(),
        online: raw.online.unwrap_or(false),
        tx_bytes: raw.tx_bytes.unwrap_or(0),
        rx_bytes: raw.rx_bytes.unwrap_or(0),
        tx_rate: raw.tx_rate.unwrap_or(0),
        rx_rate: raw.rx_rate.unwrap_or(0),
        channel_class: non_empty(raw.channel_class_str),
        vlan_id: raw.vid,
        last_active,
        extra: raw.extra,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn raw_ap(v: serde_json::Value) -> RawAccessPoint {
        serde_json::from_value(v).unwrap()
    }

    fn raw_client(v: serde_json::Value) -> RawClient {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn access_point_defaults() {
        let ap = AccessPoint::from(raw_ap(json!({ "mac": "A1" })));
        assert_eq!(ap.name, "A1");
        assert!(!ap.online);
        assert_eq!(ap.uptime_secs, 0);
        assert!(ap.firmware.is_none());
        assert!(ap.model.is_none());
    }

    #[test]
    fn unnamed_ap_is_not_indexed() {
        let index = ap_name_index(&[
            raw_ap(json!({ "mac": "A1", "name": "Lobby" })),
            raw_ap(json!({ "mac": "A2" })),
            raw_ap(json!({ "name": "Orphan" })),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index["A1"], "Lobby");
    }

    #[test]
    fn client_name_precedence() {
        let index = HashMap::from([("A1".to_owned(), "Lobby".to_owned())]);

        let joined = normalize_client(
            raw_client(json!({ "clientId": "C1", "apId": "A1", "apName": "Stale" })),
            &index,
        );
        assert_eq!(joined.ap_name, "Lobby");

        let fallback = normalize_client(
            raw_client(json!({ "clientId": "C2", "apId": "ZZ", "apName": "Legacy" })),
            &index,
        );
        assert_eq!(fallback.ap_name, "Legacy");

        let unknown = normalize_client(raw_client(json!({ "clientId": "C3" })), &index);
        assert_eq!(unknown.ap_name, UNKNOWN);
        assert_eq!(unknown.name, UNKNOWN);
        assert_eq!(unknown.ap_mac, "");
        assert_eq!(unknown.rssi, 0);
    }

    #[test]
    fn last_active_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        assert_eq!(parse_last_active("2024-06-15T10:30:00Z"), Some(expected));
        assert_eq!(parse_last_active("2024-06-15T12:30:00+02:00"), Some(expected));
        assert_eq!(parse_last_active("2024-06-15T10:30:00"), Some(expected));
        assert_eq!(parse_last_active("2024-06-15 10:30:00"), Some(expected));
        assert_eq!(parse_last_active("yesterday"), None);
    }
}
