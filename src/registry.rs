//! Cache Registry
//!
//! The four named cache stores (global, plan, user, wish), built once at
//! startup and handed to whoever needs them.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::cache::{CacheStore, DurableStorage, MemoryStorage, SharedCache, StoreConfig};

const MINUTE: u64 = 60;

// == Cache Kind ==
/// Names the stores held by a [`CacheRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    Global,
    Plan,
    User,
    Wish,
}

impl CacheKind {
    pub const ALL: [CacheKind; 4] = [
        CacheKind::Global,
        CacheKind::Plan,
        CacheKind::User,
        CacheKind::Wish,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CacheKind::Global => "global",
            CacheKind::Plan => "plan",
            CacheKind::User => "user",
            CacheKind::Wish => "wish",
        }
    }

    /// Resolves a store name. Unknown names fall back to `Global`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "plan" => CacheKind::Plan,
            "user" => CacheKind::User,
            "wish" => CacheKind::Wish,
            _ => CacheKind::Global,
        }
    }

    /// Default policy for this store.
    ///
    /// | Kind | TTL | Durable | Max items |
    /// |---|---|---|---|
    /// | global | 10 min | yes | 200 |
    /// | plan | 15 min | yes | 50 |
    /// | user | 30 min | yes | 20 |
    /// | wish | 5 min | no | 100 |
    pub fn default_config(&self) -> StoreConfig {
        let (ttl_minutes, persistent, max_memory_items) = match self {
            CacheKind::Global => (10, true, 200),
            CacheKind::Plan => (15, true, 50),
            CacheKind::User => (30, true, 20),
            CacheKind::Wish => (5, false, 100),
        };
        StoreConfig::new(
            self.name(),
            Duration::from_secs(ttl_minutes * MINUTE),
            persistent,
            max_memory_items,
        )
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// == Cache Registry ==
/// Owns one [`SharedCache`] per [`CacheKind`]. Clones share the stores.
#[derive(Debug, Clone)]
pub struct CacheRegistry {
    global: SharedCache,
    plan: SharedCache,
    user: SharedCache,
    wish: SharedCache,
}

impl CacheRegistry {
    /// Builds the stores with their default policies over `storage`.
    pub fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self::with_configs(storage, |kind| kind.default_config())
    }

    /// Builds the stores with policies supplied per kind.
    pub fn with_configs(
        storage: Arc<dyn DurableStorage>,
        configure: impl Fn(CacheKind) -> StoreConfig,
    ) -> Self {
        let build = |kind: CacheKind| {
            SharedCache::new(CacheStore::new(configure(kind)).with_storage(storage.clone()))
        };

        Self {
            global: build(CacheKind::Global),
            plan: build(CacheKind::Plan),
            user: build(CacheKind::User),
            wish: build(CacheKind::Wish),
        }
    }

    /// Registry mirrored to process memory only.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn get(&self, kind: CacheKind) -> &SharedCache {
        match kind {
            CacheKind::Global => &self.global,
            CacheKind::Plan => &self.plan,
            CacheKind::User => &self.user,
            CacheKind::Wish => &self.wish,
        }
    }

    /// Resolves a store by name, falling back to the global store.
    pub fn get_cache_instance(&self, name: &str) -> &SharedCache {
        self.get(CacheKind::from_name(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (CacheKind, &SharedCache)> {
        CacheKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}
