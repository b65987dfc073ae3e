use super::manager::now_millis;
use super::store::LobbyStore;
use crate::config::SweepPolicy;
use crate::error::StoreError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info};

/// Delete every lobby idle for longer than `stale_after` as of `now`
pub async fn sweep_once<S: LobbyStore>(
    store: &S,
    stale_after: Duration,
    now: i64,
) -> Result<u64, StoreError> {
    let window = i64::try_from(stale_after.as_millis()).unwrap_or(i64::MAX);
    let cutoff = now.saturating_sub(window);
    store.delete_stale_before(cutoff).await
}

/// Start the background reaper. The first sweep runs one interval after start;
/// a failed sweep is logged and simply waits for the next tick.
///
/// The task exits once `shutdown` is signalled (or its sender is dropped).
/// Shutdown is only observed between ticks, so a sweep that has started always
/// finishes; await the handle to wait for it.
pub fn spawn_sweeper<S: LobbyStore>(
    store: Arc<S>,
    policy: SweepPolicy,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    info!(
        interval_secs = policy.interval.as_secs(),
        stale_after_secs = policy.stale_after.as_secs(),
        "Starting lobby sweeper"
    );

    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + policy.interval, policy.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.changed() => break,
            }

            match sweep_once(store.as_ref(), policy.stale_after, now_millis()).await {
                Ok(0) => debug!("Sweep found no stale lobbies"),
                Ok(removed) => info!(removed, "Removed stale lobbies"),
                Err(e) => error!(error = %e, "Lobby sweep failed"),
            }
        }

        info!("Lobby sweeper stopped");
    })
}
