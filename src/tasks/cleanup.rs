//! Cache Cleanup Task
//!
//! Background task that periodically purges expired cache entries, so
//! results that are never requested again do not linger until the next
//! invalidation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TtlCache;
use crate::tasks::wait_or_shutdown;

/// Spawns a background task that purges expired cache entries every
/// `cleanup_interval_secs` seconds until shutdown is signalled.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(TtlCache::new());
/// let (shutdown_tx, shutdown_rx) = watch::channel(false);
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 60, shutdown_rx);
/// // Later, during shutdown:
/// shutdown_tx.send(true).ok();
/// ```
pub fn spawn_cleanup_task(
    cache: Arc<TtlCache>,
    cleanup_interval_secs: u64,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting cache cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        while !wait_or_shutdown(interval, &mut shutdown).await {
            let removed = cache.purge_expired();

            if removed > 0 {
                info!("Cache cleanup: removed {} expired entries", removed);
            } else {
                debug!("Cache cleanup: no expired entries found");
            }
        }

        info!("Cache cleanup task stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let cache = Arc::new(TtlCache::new());
        let (_tx, rx) = watch::channel(false);

        cache.set("expire_soon", "value".to_string(), Duration::from_millis(200));
        cache.set("long_lived", "value".to_string(), Duration::from_secs(3600));

        let handle = spawn_cleanup_task(cache.clone(), 1, rx);

        // Wait for the entry to expire and one cleanup to run
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(cache.len(), 1, "Expired entry should have been purged");
        assert!(cache.get::<String>("long_lived").is_some());
        assert_eq!(cache.stats().expirations, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_stops_on_shutdown() {
        let cache = Arc::new(TtlCache::new());
        let (tx, rx) = watch::channel(false);

        let handle = spawn_cleanup_task(cache, 3600, rx);
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("cleanup task should stop promptly")
            .unwrap();
    }
}
