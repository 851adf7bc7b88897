//! Access point, client and snapshot listings.

use tabled::Tabled;

use gwnly_api::GwnClient;
use gwnly_core::{AccessPoint, Client, Snapshot};

use crate::cli::{ApsArgs, ClientsArgs, GlobalOpts, ScopeArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct AccessPointRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Clients")]
    clients: u64,
    #[tabled(rename = "Uptime")]
    uptime: String,
    #[tabled(rename = "Firmware")]
    firmware: String,
    #[tabled(rename = "IPv4")]
    ipv4: String,
}

impl AccessPointRow {
    fn new(ap: &AccessPoint, color: bool) -> Self {
        Self {
            mac: ap.mac.clone(),
            name: ap.name.clone(),
            status: output::status_label(ap.online, color),
            model: output::or_dash(ap.model.as_deref().unwrap_or_default()),
            clients: ap.client_count,
            uptime: if ap.online {
                util::format_uptime(ap.uptime_secs)
            } else {
                "-".into()
            },
            firmware: output::or_dash(ap.firmware.as_deref().unwrap_or_default()),
            ipv4: output::or_dash(ap.ipv4.as_deref().unwrap_or_default()),
        }
    }
}

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "AP")]
    ap: String,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "RSSI")]
    rssi: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl ClientRow {
    fn new(c: &Client, color: bool) -> Self {
        let ap_name = if c.ap_name == gwnly_core::convert::UNKNOWN {
            output::dim(&c.ap_name, color)
        } else {
            c.ap_name.clone()
        };
        Self {
            mac: c.mac.clone(),
            name: c.name.clone(),
            ip: output::or_dash(&c.ipv4),
            ap: ap_name,
            ssid: output::or_dash(&c.ssid),
            band: output::or_dash(c.channel_class.as_deref().unwrap_or_default()),
            rssi: format!("{} dBm", c.rssi),
            status: output::status_label(c.online, color),
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

fn snapshot_detail(snap: &Snapshot, color: bool) -> String {
    let network = snap
        .network_id
        .as_ref()
        .map_or_else(|| "(unscoped)".into(), ToString::to_string);
    let aps: Vec<AccessPointRow> = snap
        .access_points
        .iter()
        .map(|ap| AccessPointRow::new(ap, color))
        .collect();
    let clients: Vec<ClientRow> = snap
        .clients
        .iter()
        .map(|c| ClientRow::new(c, color))
        .collect();

    [
        format!("Network:       {network}"),
        format!("Fetched:       {}", snap.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")),
        format!(
            "Access points: {} ({} online)",
            snap.access_points.len(),
            snap.online_access_points()
        ),
        format!(
            "Clients:       {} ({} online)",
            snap.clients.len(),
            snap.online_clients()
        ),
        String::new(),
        output::render_table(&aps),
        String::new(),
        output::render_table(&clients),
    ]
    .join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle_aps(
    client: &GwnClient,
    args: ApsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let snap = util::fetch_snapshot(client, &args.scope).await?;
    let aps: Vec<AccessPoint> = snap
        .access_points
        .into_iter()
        .filter(|ap| !args.online || ap.online)
        .collect();

    let color = output::should_color(global.color);
    let out = output::render_list(
        global.output,
        &aps,
        |ap| AccessPointRow::new(ap, color),
        |ap| ap.mac.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_clients(
    client: &GwnClient,
    args: ClientsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let snap = util::fetch_snapshot(client, &args.scope).await?;
    let clients: Vec<Client> = match args.ap.as_deref() {
        Some(ap_mac) => {
            if snap.access_point(ap_mac).is_none() {
                return Err(util::not_found("access point", ap_mac, "aps"));
            }
            snap.clients_of(ap_mac).cloned().collect()
        }
        None => snap.clients,
    };

    let color = output::should_color(global.color);
    let out = output::render_list(
        global.output,
        &clients,
        |c| ClientRow::new(c, color),
        |c| c.mac.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_snapshot(
    client: &GwnClient,
    scope: ScopeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let snap = util::fetch_snapshot(client, &scope).await?;

    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        &snap,
        |s| snapshot_detail(s, color),
        |s| s.fetched_at.to_rfc3339(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
