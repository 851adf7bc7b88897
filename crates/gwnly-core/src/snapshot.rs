// ── Snapshot builder ──
//
// One refresh cycle: resolve the network, list APs, list clients, join.
// Calls are strictly sequential and the first failure aborts the cycle.

use chrono::Utc;
use tracing::debug;

use gwnly_api::{GwnClient, NetworkId, RawAccessPoint, RawClient, RawNetwork, result_list};

use crate::convert::{ap_name_index, normalize_client};
use crate::error::SnapshotError;
use crate::model::{AccessPoint, Snapshot};

/// Build a snapshot scoped to the account's first network.
///
/// Fails with [`SnapshotError::NoNetwork`] when the network list is empty.
/// A first network without an identifier leaves the AP and client queries
/// unscoped.
pub async fn build_snapshot(client: &GwnClient) -> Result<Snapshot, SnapshotError> {
    let network_id = first_network(client).await?;
    build_snapshot_for(client, network_id).await
}

/// Build a snapshot for an explicit network, or unscoped for `None`.
pub async fn build_snapshot_for(
    client: &GwnClient,
    network_id: Option<NetworkId>,
) -> Result<Snapshot, SnapshotError> {
    let raw_aps: Vec<RawAccessPoint> =
        result_list(&client.list_access_points(network_id.as_ref()).await?)?;
    let raw_clients: Vec<RawClient> =
        result_list(&client.list_clients(network_id.as_ref()).await?)?;

    let ap_names = ap_name_index(&raw_aps);
    let access_points: Vec<AccessPoint> = raw_aps.into_iter().map(AccessPoint::from).collect();
    let clients = raw_clients
        .into_iter()
        .map(|c| normalize_client(c, &ap_names))
        .collect::<Vec<_>>();

    debug!(
        network = ?network_id,
        access_points = access_points.len(),
        clients = clients.len(),
        "snapshot built"
    );

    Ok(Snapshot {
        network_id,
        access_points,
        clients,
        fetched_at: Utc::now(),
    })
}

/// All networks on the first page, in server order.
pub async fn list_networks(client: &GwnClient) -> Result<Vec<RawNetwork>, SnapshotError> {
    Ok(result_list(&client.list_networks().await?)?)
}

async fn first_network(client: &GwnClient) -> Result<Option<NetworkId>, SnapshotError> {
    let networks = list_networks(client).await?;
    let first = networks.into_iter().next().ok_or(SnapshotError::NoNetwork)?;
    if first.id.is_none() {
        debug!("first network has no id, querying unscoped");
    }
    Ok(first.id)
}
