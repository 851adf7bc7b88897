//! Sensor table evaluation.

use chrono::Utc;
use tabled::Tabled;

use gwnly_api::GwnClient;
use gwnly_core::{DeviceKind, Reading, readings};

use crate::cli::{GlobalOpts, SensorsArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReadingRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Sensor")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

impl ReadingRow {
    fn new(r: &Reading, color: bool) -> Self {
        let value = match (&r.value, r.unit) {
            (Some(v), Some(unit)) => format!("{v} {}", unit.symbol()),
            (Some(v), None) => v.to_string(),
            (None, _) if !r.available => output::dim("unavailable", color),
            (None, _) => "-".into(),
        };
        Self {
            device: r.device_id.clone(),
            kind: kind_label(r.device_kind),
            name: r.name,
            value,
        }
    }
}

fn kind_label(kind: DeviceKind) -> &'static str {
    match kind {
        DeviceKind::AccessPoint => "AP",
        DeviceKind::Client => "Client",
    }
}

fn plain(r: &Reading) -> String {
    let value = r.value.as_ref().map(ToString::to_string).unwrap_or_default();
    format!("{}={value}", r.unique_id)
}

pub async fn handle(
    client: &GwnClient,
    args: SensorsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let snap = util::fetch_snapshot(client, &args.scope).await?;

    // Narrow to one device; the snapshot lookup is case-insensitive, the
    // reading ids carry the vendor's spelling.
    let device = match (args.ap.as_deref(), args.client.as_deref()) {
        (Some(mac), _) => Some((
            DeviceKind::AccessPoint,
            snap.access_point(mac)
                .ok_or_else(|| util::not_found("access point", mac, "aps"))?
                .mac
                .clone(),
        )),
        (None, Some(mac)) => Some((
            DeviceKind::Client,
            snap.client(mac)
                .ok_or_else(|| util::not_found("client", mac, "clients"))?
                .mac
                .clone(),
        )),
        (None, None) => None,
    };

    let selected: Vec<Reading> = readings(&snap, Utc::now())
        .into_iter()
        .filter(|r| {
            device
                .as_ref()
                .is_none_or(|(kind, id)| r.device_kind == *kind && r.device_id == *id)
        })
        .collect();

    let color = output::should_color(global.color);
    let out = output::render_list(
        global.output,
        &selected,
        |r| ReadingRow::new(r, color),
        plain,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
