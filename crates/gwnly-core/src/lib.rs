//! Domain layer between `gwnly-api` and its consumers.
//!
//! - **[`build_snapshot`]** runs one refresh cycle: resolve the account's
//!   first network, list its access points and clients, and join every
//!   client to the AP it is associated with.
//!
//! - **[`Poller`]** repeats that cycle on a fixed interval, publishing each
//!   [`Snapshot`] on a `tokio::sync::watch` channel and keeping the last
//!   good one when a cycle fails.
//!
//! - **[`sensor`]** is a data-driven table of per-device metrics evaluated
//!   against a snapshot, with device descriptors for grouping.

pub mod convert;
pub mod error;
pub mod model;
pub mod poller;
pub mod sensor;
pub mod snapshot;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::SnapshotError;
pub use model::{AccessPoint, Client, Snapshot};
pub use poller::{DEFAULT_POLL_INTERVAL, PollStatus, Poller, PollerConfig};
pub use sensor::{DeviceInfo, DeviceKind, Reading, SensorRegistry, SensorValue, readings};
pub use snapshot::{build_snapshot, build_snapshot_for, list_networks};
