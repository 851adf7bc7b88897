// ── Poller ──
//
// Runs snapshot cycles on a fixed interval and publishes the result on a
// `watch` channel. A failed cycle is logged and recorded in the status
// channel; the previously published snapshot stays in place.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use gwnly_api::GwnClient;

use crate::error::SnapshotError;
use crate::model::Snapshot;
use crate::snapshot::build_snapshot;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Outcome bookkeeping across cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollStatus {
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
}

/// Periodic snapshot refresher. Cheap to clone.
#[derive(Clone)]
pub struct Poller {
    inner: Arc<PollerInner>,
}

struct PollerInner {
    client: GwnClient,
    config: PollerConfig,
    snapshot: watch::Sender<Option<Arc<Snapshot>>>,
    status: watch::Sender<PollStatus>,
    /// Serializes cycles; a manual refresh never overlaps a scheduled one.
    cycle: Mutex<()>,
}

impl Poller {
    pub fn new(client: GwnClient, config: PollerConfig) -> Self {
        let (snapshot, _) = watch::channel(None);
        let (status, _) = watch::channel(PollStatus::default());
        Self {
            inner: Arc::new(PollerInner {
                client,
                config,
                snapshot,
                status,
                cycle: Mutex::new(()),
            }),
        }
    }

    pub fn client(&self) -> &GwnClient {
        &self.inner.client
    }

    pub fn config(&self) -> &PollerConfig {
        &self.inner.config
    }

    /// Receiver for published snapshots; `None` until the first success.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.inner.snapshot.subscribe()
    }

    pub fn status(&self) -> watch::Receiver<PollStatus> {
        self.inner.status.subscribe()
    }

    /// The last successfully built snapshot.
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.inner.snapshot.borrow().clone()
    }

    /// Run one cycle now.
    ///
    /// On success the new snapshot is published and returned. On failure
    /// the error is recorded and returned; the published snapshot is kept.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, SnapshotError> {
        let _cycle = self.inner.cycle.lock().await;

        match build_snapshot(&self.inner.client).await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.inner.snapshot.send_replace(Some(Arc::clone(&snapshot)));
                self.inner.status.send_modify(|s| {
                    s.last_success = Some(snapshot.fetched_at);
                    s.last_error = None;
                    s.consecutive_failures = 0;
                });
                Ok(snapshot)
            }
            Err(e) => {
                self.inner.status.send_modify(|s| {
                    s.last_error = Some(e.to_string());
                    s.consecutive_failures = s.consecutive_failures.saturating_add(1);
                });
                Err(e)
            }
        }
    }

    /// Initial cycle for setup: any failure is returned to the caller
    /// instead of being deferred to the next tick.
    pub async fn first_refresh(&self) -> Result<Arc<Snapshot>, SnapshotError> {
        let snapshot = self.refresh().await?;
        info!(
            access_points = snapshot.access_points.len(),
            clients = snapshot.clients.len(),
            "initial snapshot fetched"
        );
        Ok(snapshot)
    }

    /// Start the periodic refresh task. The first cycle runs one interval
    /// from now; call [`first_refresh`](Self::first_refresh) before this.
    pub fn spawn(&self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(refresh_task(self.clone(), cancel))
    }
}

async fn refresh_task(poller: Poller, cancel: CancellationToken) {
    let period = poller.inner.config.interval;
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    debug!(?period, "poller started");
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = poller.refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
    debug!("poller stopped");
}
