//! Aggregated statistics, text report and health check across the registry.

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::cache::StoreStats;
use crate::registry::{CacheKind, CacheRegistry};

/// Aggregate memory usage above which the cache is reported unhealthy.
pub const MAX_HEALTHY_MEMORY_BYTES: usize = 10 * 1024 * 1024;

/// Aggregate item count above which the cache is reported unhealthy.
pub const MAX_HEALTHY_ITEMS: usize = 500;

// == Stats Report ==
/// Per-store statistics plus their sum.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsReport {
    pub stores: BTreeMap<CacheKind, StoreStats>,
    pub total: StoreStats,
}

/// Collects stats from every store.
pub async fn get_cache_stats(registry: &CacheRegistry) -> CacheStatsReport {
    let mut stores = BTreeMap::new();
    let mut total = StoreStats::new();

    for (kind, cache) in registry.iter() {
        let stats = cache.stats().await;
        total.merge(&stats);
        stores.insert(kind, stats);
    }

    CacheStatsReport { stores, total }
}

/// Renders the stats as a fixed-width table and logs it.
pub async fn cache_report(registry: &CacheRegistry) -> String {
    let report = get_cache_stats(registry).await;
    let rows = report
        .stores
        .iter()
        .map(|(kind, stats)| (kind.name(), stats))
        .chain(std::iter::once(("total", &report.total)));

    let mut out = format!(
        "{:<8} {:>6} {:>10} {:>8} {:>8} {:>9} {:>8}\n",
        "cache", "items", "memory", "hits", "misses", "evictions", "hit-rate"
    );
    for (name, stats) in rows {
        let _ = writeln!(
            out,
            "{:<8} {:>6} {:>10} {:>8} {:>8} {:>9} {:>7.1}%",
            name,
            stats.size,
            format_bytes(stats.memory_usage),
            stats.hits,
            stats.misses,
            stats.evictions,
            stats.hit_rate * 100.0
        );
    }

    info!("Cache report:\n{}", out);
    out
}

// == Health Check ==
/// Outcome of [`cache_health_check`].
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub total: StoreStats,
    pub checked_at: DateTime<Utc>,
}

/// Flags the cache unhealthy when aggregate memory or item count is too high.
pub async fn cache_health_check(registry: &CacheRegistry) -> HealthReport {
    let total = get_cache_stats(registry).await.total;
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    if total.memory_usage > MAX_HEALTHY_MEMORY_BYTES {
        issues.push(format!(
            "Cache memory usage is high: {}",
            format_bytes(total.memory_usage)
        ));
        recommendations.push("Clear caches or shorten TTLs to reduce memory usage".to_string());
    }

    if total.size > MAX_HEALTHY_ITEMS {
        issues.push(format!("Too many cached items: {}", total.size));
        recommendations.push("Lower max items per cache or invalidate unused keys".to_string());
    }

    HealthReport {
        healthy: issues.is_empty(),
        issues,
        recommendations,
        total,
        checked_at: Utc::now(),
    }
}

fn format_bytes(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let bytes = bytes as f64;
    if bytes >= KB * KB {
        format!("{:.2}MB", bytes / (KB * KB))
    } else if bytes >= KB {
        format!("{:.2}KB", bytes / KB)
    } else {
        format!("{}B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryStorage, StoreConfig};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_stats_aggregate_all_stores() {
        let registry = CacheRegistry::in_memory();
        registry.get(CacheKind::Plan).set("a", &1, None).await.unwrap();
        registry.get(CacheKind::Wish).set("b", &2, None).await.unwrap();
        registry.get(CacheKind::Wish).get_value("b").await;
        registry.get(CacheKind::Wish).get_value("missing").await;

        let report = get_cache_stats(&registry).await;

        assert_eq!(report.stores.len(), 4);
        assert_eq!(report.stores[&CacheKind::Plan].size, 1);
        assert_eq!(report.stores[&CacheKind::Wish].size, 1);
        assert_eq!(report.total.size, 2);
        assert_eq!(
            report.total.memory_usage,
            report.stores.values().map(|s| s.memory_usage).sum::<usize>()
        );
        assert!((report.total.hit_rate - 0.5).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_report_lists_every_store() {
        let registry = CacheRegistry::in_memory();
        let report = cache_report(&registry).await;

        for name in ["global", "plan", "user", "wish", "total"] {
            assert!(report.contains(name), "missing row {}", name);
        }
    }

    #[tokio::test]
    async fn test_empty_registry_is_healthy() {
        let report = cache_health_check(&CacheRegistry::in_memory()).await;
        assert!(report.healthy);
        assert!(report.issues.is_empty());
        assert!(report.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_too_many_items_is_unhealthy() {
        let registry = CacheRegistry::with_configs(Arc::new(MemoryStorage::new()), |kind| {
            StoreConfig::new(kind.name(), Duration::from_secs(60), false, 1_000)
        });
        let global = registry.get(CacheKind::Global);
        for i in 0..=MAX_HEALTHY_ITEMS {
            global.set(&format!("k{}", i), &i, None).await.unwrap();
        }

        let report = cache_health_check(&registry).await;

        assert!(!report.healthy);
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].contains("Too many cached items"));
        assert_eq!(report.recommendations.len(), 1);
    }

    #[tokio::test]
    async fn test_high_memory_is_unhealthy() {
        let registry = CacheRegistry::in_memory();
        let big = "x".repeat(MAX_HEALTHY_MEMORY_BYTES / 2);
        registry
            .get(CacheKind::Wish)
            .set("big", &big, None)
            .await
            .unwrap();

        let report = cache_health_check(&registry).await;

        assert!(!report.healthy);
        assert!(report.issues[0].contains("memory usage is high"));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512B");
        assert_eq!(format_bytes(2048), "2.00KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00MB");
    }
}
