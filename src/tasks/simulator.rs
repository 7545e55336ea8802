//! Live-Update Simulator
//!
//! Background task that periodically rewrites the availability of every
//! station to imitate a live feed, then invalidates the cache once.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::cache::TtlCache;
use crate::error::{Result, StationError};
use crate::stations::StationStore;
use crate::tasks::wait_or_shutdown;

/// Smallest capacity a simulated station can have.
const MIN_CAPACITY: i64 = 10;

/// Largest random capacity change per pass, in either direction.
const MAX_CAPACITY_DELTA: i64 = 5;

/// Timing of the simulator loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Time between passes
    pub interval: Duration,
    /// Delay before the first pass
    pub warmup: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(15),
            warmup: Duration::from_secs(5),
        }
    }
}

impl From<&crate::config::Config> for SimulatorConfig {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            interval: Duration::from_secs(config.simulator_interval),
            warmup: Duration::from_secs(config.simulator_warmup),
        }
    }
}

/// Draws new `(available_bikes, available_bike_stands)` for a station.
///
/// Capacity moves by up to ±5 with a floor of 10; bikes are uniform over
/// `0..=capacity` and stands take the remainder.
pub fn next_availability<R: Rng>(capacity: u32, rng: &mut R) -> Result<(u32, u32)> {
    let delta = rng.gen_range(-MAX_CAPACITY_DELTA..=MAX_CAPACITY_DELTA);
    let new_capacity = (i64::from(capacity) + delta).max(MIN_CAPACITY);
    let new_capacity = u32::try_from(new_capacity).map_err(|_| {
        StationError::Transient(format!("capacity {} out of range", new_capacity))
    })?;

    let available_bikes = rng.gen_range(0..=new_capacity);
    Ok((available_bikes, new_capacity - available_bikes))
}

/// Runs one pass over every station, then clears the cache once.
///
/// Works from a point-in-time copy, so stations deleted mid-pass are skipped
/// by the store. Returns the number of stations updated.
pub async fn run_pass<R: Rng>(
    store: &StationStore,
    cache: &TtlCache,
    rng: &mut R,
) -> Result<usize> {
    let stations = store.list().await;

    let mut updates = Vec::with_capacity(stations.len());
    for station in &stations {
        let (bikes, stands) = next_availability(station.bike_stands, rng)?;
        updates.push((station.number, bikes, stands));
    }

    for (number, bikes, stands) in &updates {
        store.set_availability(*number, *bikes, *stands).await;
    }

    cache.clear();
    Ok(updates.len())
}

/// Spawns the simulator loop.
///
/// Waits `warmup` before the first pass and `interval` between passes. A
/// failed pass is logged and the loop carries on; shutdown interrupts any
/// wait without starting another pass.
pub fn spawn_simulator(
    store: Arc<StationStore>,
    cache: Arc<TtlCache>,
    config: SimulatorConfig,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting live-update simulator (warmup {:?}, interval {:?})",
            config.warmup, config.interval
        );
        let mut rng = StdRng::from_entropy();

        if wait_or_shutdown(config.warmup, &mut shutdown).await {
            info!("Live-update simulator stopped before first pass");
            return;
        }

        loop {
            match run_pass(&store, &cache, &mut rng).await {
                Ok(count) => info!(
                    "Simulator updated {} stations at {}",
                    count,
                    chrono::Utc::now().format("%H:%M:%S")
                ),
                Err(e) => error!("Simulator pass failed: {}", e),
            }

            if wait_or_shutdown(config.interval, &mut shutdown).await {
                break;
            }
        }

        info!("Live-update simulator stopped");
    })
}
