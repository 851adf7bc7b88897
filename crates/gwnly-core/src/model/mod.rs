// ── Domain model ──
//
// Canonical, defaulted views of the vendor payloads. Everything here is
// produced by `convert` and consumed by the sensor table, the poller and
// the CLI.

pub mod access_point;
pub mod client;
pub mod snapshot;

pub use access_point::AccessPoint;
pub use client::Client;
pub use snapshot::Snapshot;

/// Case-insensitive MAC comparison for user-supplied lookups.
pub(crate) fn mac_eq(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
