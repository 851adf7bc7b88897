//! Watch mode: run the poller and print one line per refresh cycle.

use std::time::Duration;

use owo_colors::OwoColorize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use gwnly_api::GwnClient;
use gwnly_core::{Poller, PollerConfig, Snapshot};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

fn summary(snap: &Snapshot) -> String {
    format!(
        "[{}] {} APs ({} online), {} clients ({} online)",
        snap.fetched_at.format("%H:%M:%S"),
        snap.access_points.len(),
        snap.online_access_points(),
        snap.clients.len(),
        snap.online_clients()
    )
}

fn print_cycle(snap: &Snapshot, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, snap, summary, summary)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(
    client: GwnClient,
    args: WatchArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let interval = args
        .interval
        .map_or_else(|| config::poll_interval(cfg), |s| Duration::from_secs(s.max(1)));
    let server = client.base_url().clone();
    let poller = Poller::new(client, PollerConfig { interval });

    // The first cycle must succeed; later failures only warn.
    let first = poller
        .first_refresh()
        .await
        .map_err(|e| CliError::from_snapshot(e, &server))?;
    print_cycle(&first, global)?;

    let mut snapshots = poller.subscribe();
    let mut status = poller.status();
    let cancel = CancellationToken::new();
    let handle = poller.spawn(cancel.clone());
    info!(
        interval = %humantime::format_duration(interval),
        "watching, press Ctrl-C to stop"
    );

    let color = output::should_color(global.color);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = snapshots.borrow_and_update().clone();
                if let Some(snap) = latest {
                    print_cycle(&snap, global)?;
                }
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = status.borrow_and_update().clone();
                if let Some(err) = current.last_error.filter(|_| current.consecutive_failures > 0) {
                    let line = format!(
                        "refresh failed ({} in a row), keeping last snapshot: {err}",
                        current.consecutive_failures
                    );
                    if color {
                        eprintln!("{}", line.yellow());
                    } else {
                        eprintln!("{line}");
                    }
                }
            }
        }
    }

    cancel.cancel();
    let _ = handle.await;
    Ok(())
}
