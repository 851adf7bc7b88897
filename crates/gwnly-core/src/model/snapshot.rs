// ── Snapshot ──

use chrono::{DateTime, Utc};
use gwnly_api::NetworkId;
use serde::{Deserialize, Serialize};

use super::{AccessPoint, Client, mac_eq};

/// Everything fetched in one refresh cycle.
///
/// Built in full before it is handed out; consumers never observe a
/// half-populated snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Network the AP and client queries were scoped to, if any.
    pub network_id: Option<NetworkId>,
    pub access_points: Vec<AccessPoint>,
    pub clients: Vec<Client>,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn access_point(&self, mac: &str) -> Option<&AccessPoint> {
        self.access_points.iter().find(|ap| mac_eq(&ap.mac, mac))
    }

    pub fn client(&self, mac: &str) -> Option<&Client> {
        self.clients.iter().find(|c| mac_eq(&c.mac, mac))
    }

    /// Clients associated with the AP `ap_mac`.
    pub fn clients_of<'a>(&'a self, ap_mac: &'a str) -> impl Iterator<Item = &'a Client> + 'a {
        self.clients.iter().filter(move |c| mac_eq(&c.ap_mac, ap_mac))
    }

    pub fn online_access_points(&self) -> usize {
        self.access_points.iter().filter(|ap| ap.online).count()
    }

    pub fn online_clients(&self) -> usize {
        self.clients.iter().filter(|c| c.online).count()
    }
}
