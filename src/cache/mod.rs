//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, version-based
//! invalidation, insertion-order eviction and an optional durable mirror.

mod entry;
mod pattern;
mod shared;
mod stats;
mod storage;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use pattern::KeyPattern;
pub use shared::SharedCache;
pub use stats::StoreStats;
pub use storage::{DurableStorage, FileStorage, MemoryStorage, StorageResult};
pub use store::{CacheStore, StoreConfig, STORAGE_PREFIX, VERSION_KEY_PREFIX};
