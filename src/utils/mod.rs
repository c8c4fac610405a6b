//! Cache Utilities
//!
//! Cross-cutting operations over a [`CacheRegistry`](crate::registry::CacheRegistry):
//! targeted clearing, stats, health checks and warmup.

pub mod keys;
mod maintenance;
mod report;
mod warmup;

pub use maintenance::{clear_all_caches, clear_plan_caches, clear_user_caches};
pub use report::{
    cache_health_check, cache_report, get_cache_stats, CacheStatsReport, HealthReport,
    MAX_HEALTHY_ITEMS, MAX_HEALTHY_MEMORY_BYTES,
};
pub use warmup::{spawn_warmup, warmup_cache};
