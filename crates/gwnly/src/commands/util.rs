//! Shared helpers for command handlers.

use std::time::Duration;

use gwnly_api::{GwnClient, NetworkId};
use gwnly_core::{Snapshot, build_snapshot, build_snapshot_for};

use crate::cli::ScopeArgs;
use crate::error::CliError;

/// Fetch a snapshot for `--network`, or for the first network on the account.
pub async fn fetch_snapshot(client: &GwnClient, scope: &ScopeArgs) -> Result<Snapshot, CliError> {
    let result = match scope.network.as_deref() {
        Some(raw) => {
            let Ok(network) = raw.parse::<NetworkId>();
            build_snapshot_for(client, Some(network)).await
        }
        None => build_snapshot(client).await,
    };
    result.map_err(|e| CliError::from_snapshot(e, client.base_url()))
}

/// Compact human duration, e.g. `3h 12m` (seconds dropped above one hour).
pub fn format_uptime(secs: u64) -> String {
    let rounded = if secs >= 3600 { secs - secs % 60 } else { secs };
    humantime::format_duration(Duration::from_secs(rounded)).to_string()
}

/// Byte count in binary units, one decimal.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Error for a MAC that is not part of the current snapshot.
pub fn not_found(resource_type: &str, identifier: &str, list_command: &str) -> CliError {
    CliError::NotFound {
        resource_type: resource_type.into(),
        identifier: identifier.into(),
        list_command: list_command.into(),
    }
}
