//! lifecache - client-side data cache for plans, wishes and user data
//!
//! TTL-based, version-tagged cache stores with insertion-order eviction and
//! an optional durable mirror, grouped into a registry of named stores with
//! utilities for targeted invalidation, stats, health checks and warmup.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod source;
pub mod tasks;
pub mod utils;

pub use api::AppState;
pub use cache::{CacheStore, SharedCache, StoreConfig};
pub use config::Config;
pub use error::{CacheError, Result};
pub use registry::{CacheKind, CacheRegistry};
pub use tasks::spawn_monitor_task;
