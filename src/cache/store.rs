//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with TTL expiration, version
//! tags, insertion-order eviction and an optional durable mirror.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, DurableStorage, KeyPattern, StoreStats};
use crate::error::Result;

/// Prefix shared by every durable key written by a cache store.
pub const STORAGE_PREFIX: &str = "cache_";

/// Prefix of the durable key holding a store's current version. Sits outside
/// every store namespace so `clear()` leaves it alone.
pub const VERSION_KEY_PREFIX: &str = "cache__version_";

// == Store Config ==
/// Per-store policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Store name, also used to namespace durable keys
    pub name: String,
    /// TTL applied when `set` is called without one
    pub default_ttl: Duration,
    /// Mirror entries to durable storage
    pub persistent: bool,
    /// Maximum number of entries kept in memory
    pub max_memory_items: usize,
}

impl StoreConfig {
    pub fn new(
        name: impl Into<String>,
        default_ttl: Duration,
        persistent: bool,
        max_memory_items: usize,
    ) -> Self {
        Self {
            name: name.into(),
            default_ttl,
            persistent,
            max_memory_items,
        }
    }
}

#[derive(Debug)]
struct Slot {
    entry: CacheEntry,
    /// Insertion sequence, breaks ties between equal `stored_at` stamps
    seq: u64,
}

// == Cache Store ==
/// Bounded, TTL-based, version-tagged key-value cache.
#[derive(Debug)]
pub struct CacheStore {
    config: StoreConfig,
    /// In-memory entries
    entries: HashMap<String, Slot>,
    /// Durable mirror, only set for persistent stores
    storage: Option<Arc<dyn DurableStorage>>,
    /// Entries tagged with any other version are stale
    version: u64,
    next_seq: u64,
    stats: StoreStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a memory-only store.
    ///
    /// Call [`CacheStore::with_storage`] to attach a durable mirror.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            entries: HashMap::new(),
            storage: None,
            version: 1,
            next_seq: 0,
            stats: StoreStats::new(),
        }
    }

    /// Attaches a durable mirror. Ignored unless the config is persistent.
    ///
    /// Restores the version recorded by a previous run, so entries written
    /// after a version bump stay valid across restarts.
    pub fn with_storage(mut self, storage: Arc<dyn DurableStorage>) -> Self {
        if self.config.persistent {
            self.storage = Some(storage);
            if let Some(version) = self.load_version() {
                self.version = version;
            }
        }
        self
    }

    // == Set ==
    /// Stores a value with optional TTL.
    ///
    /// If the key already exists, the entry is replaced and counts as newly
    /// inserted. Durable write failures are logged, never returned.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - Any JSON-serializable value
    /// * `ttl` - Optional TTL (uses the store default if None)
    pub fn set<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let value = serde_json::to_value(value)?;
        let entry = CacheEntry::new(
            value,
            ttl.unwrap_or(self.config.default_ttl),
            self.version,
        );

        self.persist(key, &entry);
        self.insert_slot(key.to_string(), entry);
        self.enforce_memory_limit();

        Ok(())
    }

    // == Get ==
    /// Retrieves a value and decodes it as `T`.
    ///
    /// Returns `Ok(None)` on a miss. Errors only when the stored JSON does not
    /// decode as `T`.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>> {
        match self.get_value(key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Retrieves the raw JSON value.
    ///
    /// Invalid entries (expired or stale version) are removed from memory and
    /// durable storage and reported as a miss.
    pub fn get_value(&mut self, key: &str) -> Option<Value> {
        let value = self.lookup(key);
        if value.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        value
    }

    // == Has ==
    /// True iff `get_value(key)` would return a value.
    pub fn has(&mut self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    // == Delete ==
    /// Removes an entry from memory and durable storage. Idempotent.
    pub fn delete(&mut self, key: &str) {
        self.entries.remove(key);

        if let Some(storage) = &self.storage {
            if let Err(err) = storage.remove_item(&self.storage_key(key)) {
                warn!(
                    "Cache '{}': failed to remove '{}' from durable storage: {}",
                    self.config.name, key, err
                );
            }
        }
    }

    // == Clear ==
    /// Removes every entry, including all durable keys in this store's
    /// namespace.
    pub fn clear(&mut self) {
        self.entries.clear();

        if let Some(storage) = &self.storage {
            for storage_key in self.durable_keys() {
                if let Err(err) = storage.remove_item(&storage_key) {
                    warn!(
                        "Cache '{}': failed to remove '{}' from durable storage: {}",
                        self.config.name, storage_key, err
                    );
                }
            }
        }

        debug!("Cache '{}' cleared", self.config.name);
    }

    // == Invalidate ==
    /// Deletes every key matching `pattern`.
    ///
    /// Returns the number of keys removed.
    pub fn invalidate(&mut self, pattern: impl Into<KeyPattern>) -> usize {
        let pattern = pattern.into();
        let prefix = self.namespace();

        let mut matched: HashSet<String> = self
            .entries
            .keys()
            .filter(|key| pattern.matches(key))
            .cloned()
            .collect();

        if self.storage.is_some() {
            matched.extend(
                self.durable_keys()
                    .into_iter()
                    .filter_map(|k| k.strip_prefix(prefix.as_str()).map(str::to_string))
                    .filter(|key| pattern.matches(key)),
            );
        }

        for key in &matched {
            self.delete(key);
        }

        debug!(
            "Cache '{}': invalidated {} keys matching {:?}",
            self.config.name,
            matched.len(),
            pattern
        );
        matched.len()
    }

    // == Increment Version ==
    /// Bumps the store version and clears every entry.
    pub fn increment_version(&mut self) -> u64 {
        self.version += 1;
        self.persist_version();
        self.clear();
        info!(
            "Cache '{}' moved to version {}",
            self.config.name, self.version
        );
        self.version
    }

    // == Stats ==
    /// Returns current statistics.
    ///
    /// `memory_usage` counts two bytes per UTF-16 code unit of each key and
    /// its serialized entry.
    pub fn stats(&self) -> StoreStats {
        let mut stats = self.stats.clone();
        stats.size = self.entries.len();
        stats.memory_usage = self
            .entries
            .iter()
            .map(|(key, slot)| {
                let entry_len = serde_json::to_string(&slot.entry)
                    .map(|s| utf16_len(&s))
                    .unwrap_or(0);
                (utf16_len(key) + entry_len) * 2
            })
            .sum();
        stats
    }

    // == Purge Invalid ==
    /// Removes all expired or stale in-memory entries.
    ///
    /// Returns the number of entries removed.
    pub fn purge_invalid(&mut self) -> usize {
        let version = self.version;
        let invalid: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, slot)| !slot.entry.is_valid(version))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &invalid {
            self.delete(key);
        }
        invalid.len()
    }

    // == Accessors ==
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Current version tag.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the current number of entries in memory.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when entries are mirrored to durable storage.
    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }

    // == Internals ==
    fn lookup(&mut self, key: &str) -> Option<Value> {
        if let Some(slot) = self.entries.get(key) {
            if slot.entry.is_valid(self.version) {
                return Some(slot.entry.value.clone());
            }
            self.delete(key);
            return None;
        }

        let storage = self.storage.clone()?;
        let raw = match storage.get_item(&self.storage_key(key)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(
                    "Cache '{}': failed to read '{}' from durable storage: {}",
                    self.config.name, key, err
                );
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) if entry.is_valid(self.version) => {
                let value = entry.value.clone();
                debug!(
                    "Cache '{}': promoted '{}' from durable storage",
                    self.config.name, key
                );
                self.insert_slot(key.to_string(), entry);
                self.enforce_memory_limit();
                Some(value)
            }
            Ok(_) => {
                self.delete(key);
                None
            }
            Err(err) => {
                warn!(
                    "Cache '{}': discarding unreadable durable entry '{}': {}",
                    self.config.name, key, err
                );
                self.delete(key);
                None
            }
        }
    }

    fn insert_slot(&mut self, key: String, entry: CacheEntry) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(key, Slot { entry, seq });
    }

    fn persist(&self, key: &str, entry: &CacheEntry) {
        let Some(storage) = &self.storage else {
            return;
        };

        let result = serde_json::to_string(entry)
            .map_err(|err| err.to_string())
            .and_then(|raw| {
                storage
                    .set_item(&self.storage_key(key), &raw)
                    .map_err(|err| err.to_string())
            });

        if let Err(err) = result {
            warn!(
                "Cache '{}': failed to write '{}' to durable storage: {}",
                self.config.name, key, err
            );
        }
    }

    /// Evicts the earliest-stored entries until the memory bound holds.
    fn enforce_memory_limit(&mut self) {
        let limit = self.config.max_memory_items;
        if self.entries.len() <= limit {
            return;
        }

        let mut by_age: Vec<(u64, u64, String)> = self
            .entries
            .iter()
            .map(|(key, slot)| (slot.entry.stored_at, slot.seq, key.clone()))
            .collect();
        by_age.sort_unstable();

        let excess = self.entries.len() - limit;
        for (_, _, key) in by_age.into_iter().take(excess) {
            self.delete(&key);
            self.stats.record_eviction();
            debug!("Cache '{}': evicted '{}'", self.config.name, key);
        }
    }

    fn version_key(&self) -> String {
        format!("{}{}", VERSION_KEY_PREFIX, self.config.name)
    }

    fn load_version(&self) -> Option<u64> {
        let storage = self.storage.as_ref()?;
        match storage.get_item(&self.version_key()) {
            Ok(Some(raw)) => match raw.trim().parse::<u64>() {
                Ok(version) if version >= 1 => Some(version),
                _ => {
                    warn!(
                        "Cache '{}': ignoring unreadable stored version '{}'",
                        self.config.name, raw
                    );
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(
                    "Cache '{}': failed to read stored version: {}",
                    self.config.name, err
                );
                None
            }
        }
    }

    fn persist_version(&self) {
        let Some(storage) = &self.storage else {
            return;
        };

        if let Err(err) = storage.set_item(&self.version_key(), &self.version.to_string()) {
            warn!(
                "Cache '{}': failed to record version {}: {}",
                self.config.name, self.version, err
            );
        }
    }

    fn namespace(&self) -> String {
        format!("{}{}_", STORAGE_PREFIX, self.config.name)
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.namespace(), key)
    }

    /// Durable keys (namespaced form) belonging to this store.
    fn durable_keys(&self) -> Vec<String> {
        let Some(storage) = &self.storage else {
            return Vec::new();
        };

        let prefix = self.namespace();
        match storage.keys() {
            Ok(keys) => keys.into_iter().filter(|k| k.starts_with(&prefix)).collect(),
            Err(err) => {
                warn!(
                    "Cache '{}': failed to list durable storage keys: {}",
                    self.config.name, err
                );
                Vec::new()
            }
        }
    }
}

fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}
