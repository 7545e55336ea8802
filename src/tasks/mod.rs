//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Live-update simulator: rewrites station availability and invalidates the cache
//! - Cache cleanup: purges expired cache entries at configured intervals
//!
//! Both tasks stop when `true` is sent on the shared shutdown channel (or the
//! sender is dropped).

mod cleanup;
mod simulator;

use std::time::Duration;

use tokio::sync::watch;

pub use cleanup::spawn_cleanup_task;
pub use simulator::{next_availability, run_pass, spawn_simulator, SimulatorConfig};

/// Sleeps for `delay` unless shutdown is signalled first.
///
/// Returns true if the caller should stop.
pub(crate) async fn wait_or_shutdown(delay: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    if *shutdown.borrow() {
        return true;
    }

    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return false,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return true;
                }
            }
        }
    }
}
