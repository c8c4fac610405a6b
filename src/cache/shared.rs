//! Shared Cache Handle
//!
//! Cloneable async access to a single [`CacheStore`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::cache::{CacheStore, KeyPattern, StoreStats};
use crate::error::{CacheError, Result};

// == Shared Cache ==
/// Handle to one cache store, cheap to clone.
///
/// The lock is never held across a factory await, so a slow fetch does not
/// block other readers of the same store.
#[derive(Debug, Clone)]
pub struct SharedCache {
    name: Arc<str>,
    inner: Arc<RwLock<CacheStore>>,
}

impl SharedCache {
    pub fn new(store: CacheStore) -> Self {
        Self {
            name: Arc::from(store.name()),
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Name of the wrapped store.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        self.inner.write().await.set(key, value, ttl)
    }

    // Reads take the write lock: misses delete invalid entries and all reads
    // update stats.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.inner.write().await.get(key)
    }

    pub async fn get_value(&self, key: &str) -> Option<Value> {
        self.inner.write().await.get_value(key)
    }

    pub async fn has(&self, key: &str) -> bool {
        self.inner.write().await.has(key)
    }

    pub async fn delete(&self, key: &str) {
        self.inner.write().await.delete(key)
    }

    pub async fn clear(&self) {
        self.inner.write().await.clear()
    }

    pub async fn invalidate(&self, pattern: impl Into<KeyPattern>) -> usize {
        self.inner.write().await.invalidate(pattern)
    }

    pub async fn increment_version(&self) -> u64 {
        self.inner.write().await.increment_version()
    }

    pub async fn version(&self) -> u64 {
        self.inner.read().await.version()
    }

    pub async fn purge_invalid(&self) -> usize {
        self.inner.write().await.purge_invalid()
    }

    pub async fn stats(&self) -> StoreStats {
        self.inner.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    // == Get Or Set ==
    /// Returns the cached value, or runs `factory` and caches its result.
    ///
    /// The factory runs at most once per call. Concurrent misses on the same
    /// key each run their own factory and the last write wins. Factory errors
    /// are returned as [`CacheError::Factory`] and nothing is cached.
    pub async fn get_or_set<T, F, Fut>(
        &self,
        key: &str,
        factory: F,
        ttl: Option<Duration>,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        if let Some(value) = self.get::<T>(key).await? {
            return Ok(value);
        }

        let value = factory().await.map_err(CacheError::Factory)?;
        self.set(key, &value, ttl).await?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::StoreConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn shared(max_memory_items: usize) -> SharedCache {
        SharedCache::new(CacheStore::new(StoreConfig::new(
            "test",
            Duration::from_secs(300),
            false,
            max_memory_items,
        )))
    }

    #[tokio::test]
    async fn test_get_or_set_calls_factory_once() {
        let cache = shared(10);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value: String = cache
                .get_or_set(
                    "user_profile_1",
                    || async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok("alice".to_string())
                    },
                    None,
                )
                .await
                .unwrap();
            assert_eq!(value, "alice");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_or_set_propagates_factory_error() {
        let cache = shared(10);

        let result: Result<String> = cache
            .get_or_set("k", || async { Err(anyhow::anyhow!("backend down")) }, None)
            .await;

        assert!(matches!(result, Err(CacheError::Factory(_))));
        assert!(!cache.has("k").await);
    }

    #[tokio::test]
    async fn test_get_or_set_refetches_after_ttl() {
        let cache = shared(10);
        let calls = AtomicUsize::new(0);
        let ttl = Some(Duration::from_millis(30));

        let factory = || async {
            Ok(calls.fetch_add(1, Ordering::SeqCst))
        };
        assert_eq!(cache.get_or_set("k", factory, ttl).await.unwrap(), 0);

        tokio::time::sleep(Duration::from_millis(60)).await;

        let factory = || async {
            Ok(calls.fetch_add(1, Ordering::SeqCst))
        };
        assert_eq!(cache.get_or_set("k", factory, ttl).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_each_run_factory() {
        let cache = shared(10);
        let calls = Arc::new(AtomicUsize::new(0));

        let make = |n: u32| {
            let cache = cache.clone();
            let calls = calls.clone();
            async move {
                cache
                    .get_or_set(
                        "k",
                        || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            Ok(n)
                        },
                        None,
                    )
                    .await
            }
        };

        let (a, b) = tokio::join!(make(1), make(2));
        assert_eq!(a.unwrap(), 1);
        assert_eq!(b.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.has("k").await);
    }

    #[tokio::test]
    async fn test_handles_share_one_store() {
        let cache = shared(10);
        let other = cache.clone();

        cache.set("k", &1, None).await.unwrap();
        assert_eq!(other.get::<i32>("k").await.unwrap(), Some(1));
        assert_eq!(other.name(), "test");
        assert_eq!(other.len().await, 1);
    }
}
