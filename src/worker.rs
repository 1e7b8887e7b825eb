use crate::data_structures::SharedReportCache;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Smallest pause between sweeps, so a tiny TTL cannot spin the loop.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Sweeps are spaced by the cache TTL, clamped to at least one second.
pub fn sweep_interval(ttl: Duration) -> Duration {
    ttl.max(MIN_SWEEP_INTERVAL)
}

#[instrument(skip(cache))]
pub async fn run(cache: SharedReportCache, every: Duration) {
    info!(every_secs = every.as_secs(), "Starting report cache sweeper");
    let mut ticker = tokio::time::interval(every);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let (removed, remaining) = {
            let mut guard = cache.lock().await;
            let removed = guard.purge_expired();
            (removed, guard.len())
        };
        if removed > 0 {
            info!(removed, remaining, "Evicted expired reports");
        } else {
            debug!(remaining, "No expired reports");
        }
    }
}
