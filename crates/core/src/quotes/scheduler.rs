//! Background scheduler for periodic reconciliation.
//!
//! Runs a fixed-interval sync loop for the lifetime of the process.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::task::JoinHandle;
use tokio::time::interval;

use super::client::RemoteQuoteSource;
use super::constants::SYNC_INTERVAL_SECS;
use super::snapshot::SnapshotStore;
use super::sync::QuoteSyncService;

/// Start the recurring sync loop with the default 30 second interval.
pub fn start_sync_scheduler<R, S>(service: Arc<QuoteSyncService<R, S>>) -> JoinHandle<()>
where
    R: RemoteQuoteSource + 'static,
    S: SnapshotStore + 'static,
{
    start_sync_scheduler_with_period(service, Duration::from_secs(SYNC_INTERVAL_SECS))
}

/// Start the recurring sync loop.
///
/// Runs one cycle immediately (the process-start trigger), then one per
/// interval tick. The loop never exits on its own; the returned handle can
/// be used to observe or abort it.
pub fn start_sync_scheduler_with_period<R, S>(
    service: Arc<QuoteSyncService<R, S>>,
    period: Duration,
) -> JoinHandle<()>
where
    R: RemoteQuoteSource + 'static,
    S: SnapshotStore + 'static,
{
    tokio::spawn(async move {
        info!("Quote sync scheduler started ({:?} interval)", period);

        run_scheduled_cycle(&service).await;

        let mut ticker = interval(period);
        ticker.tick().await; // the first tick resolves immediately

        loop {
            ticker.tick().await;
            run_scheduled_cycle(&service).await;
        }
    })
}

/// Runs a single scheduled cycle, absorbing failures.
async fn run_scheduled_cycle<R, S>(service: &QuoteSyncService<R, S>)
where
    R: RemoteQuoteSource + 'static,
    S: SnapshotStore + 'static,
{
    match service.run_cycle().await {
        Ok(outcome) => info!("Scheduled sync: {}", outcome.summary()),
        Err(e) => warn!("Scheduled sync failed: {}", e),
    }
}
