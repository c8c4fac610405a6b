//! Cache Monitor Task
//!
//! Background task that periodically purges invalid entries and checks
//! cache health.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::registry::CacheRegistry;
use crate::utils::cache_health_check;

/// Interval used when none is configured.
pub const DEFAULT_MONITOR_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Spawns a background task that monitors the registry.
///
/// Each run removes expired or stale in-memory entries from every store,
/// then runs the health check and logs a warning when it fails. The task
/// loops until aborted.
///
/// # Arguments
/// * `registry` - Registry to monitor (clones share the stores)
/// * `interval` - Delay between runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let registry = CacheRegistry::in_memory();
/// let monitor = spawn_monitor_task(registry.clone(), DEFAULT_MONITOR_INTERVAL);
/// // Later, during shutdown:
/// monitor.abort();
/// ```
pub fn spawn_monitor_task(registry: CacheRegistry, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting cache monitor with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let mut purged = 0;
            for (_, cache) in registry.iter() {
                purged += cache.purge_invalid().await;
            }
            if purged > 0 {
                info!("Cache monitor: purged {} invalid entries", purged);
            }

            let report = cache_health_check(&registry).await;
            if report.healthy {
                debug!(
                    "Cache monitor: healthy ({} items, {} bytes)",
                    report.total.size, report.total.memory_usage
                );
            } else {
                warn!(
                    "Cache health check failed: {}; recommendations: {}",
                    report.issues.join(", "),
                    report.recommendations.join(", ")
                );
            }
        }
    })
}
