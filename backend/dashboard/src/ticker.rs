//! Long-running background task that refreshes the throughput reading with a
//! random value, standing in for a live TPS metric.

use std::ops::Range;
use std::time::Duration;

use payops_core::{PaymentStore, RandomSource};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Readings are drawn uniformly from this range.
pub const TPS_RANGE: Range<f64> = 0.8..2.2;

/// Spawn the ticker loop as a background [`tokio`] task.
pub async fn run(
    store: PaymentStore,
    mut random: Box<dyn RandomSource>,
    period: Duration,
    shutdown: CancellationToken,
) {
    info!("Throughput ticker starting, period {}s", period.as_secs());

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; keep the initial reading until a
    // full period has passed.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Throughput ticker stopped");
                break;
            }
            _ = interval.tick() => {
                tick(&store, random.as_mut());
            }
        }
    }
}

/// Draw one reading and write it to the store.
pub fn tick(store: &PaymentStore, random: &mut dyn RandomSource) -> f64 {
    let tps = random.pick_f64(TPS_RANGE);
    match store.set_throughput(tps) {
        Ok(()) => debug!("Throughput now {tps:.2} TPS"),
        Err(e) => error!("Throughput update rejected: {e}"),
    }
    tps
}
