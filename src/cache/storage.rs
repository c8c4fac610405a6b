//! Durable Storage Module
//!
//! Flat string key-value backends used to mirror cache entries across restarts.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::StorageError;

/// Storage result type.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// == Durable Storage Trait ==
/// A flat, synchronous string key-value store.
///
/// Keys share one namespace across all users of a backend, so callers are
/// expected to prefix their keys.
pub trait DurableStorage: Send + Sync + std::fmt::Debug {
    /// Returns the stored string, or None if the key is absent.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// Lists every stored key.
    fn keys(&self) -> StorageResult<Vec<String>>;
}

// == File Storage ==
const FILE_EXTENSION: &str = "json";

/// On-disk envelope for one item.
#[derive(Debug, Deserialize)]
struct StoredItem {
    key: String,
    value: String,
}

#[derive(Serialize)]
struct StoredItemRef<'a> {
    key: &'a str,
    value: &'a str,
}

/// Stores each key as one file under a directory.
///
/// File names are the hex SHA-256 digest of the key, so any key string of any
/// length is safe. Each file holds a JSON envelope carrying the original key
/// next to the value, which is how `keys()` recovers it. The quota counts
/// envelope bytes on disk.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
    quota_bytes: Option<u64>,
}

impl FileStorage {
    /// Opens (creating if needed) a storage directory.
    ///
    /// # Arguments
    /// * `dir` - Directory holding the entries
    /// * `quota_bytes` - Maximum total bytes of stored files, None = unlimited
    pub fn open(dir: impl Into<PathBuf>, quota_bytes: Option<u64>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, quota_bytes })
    }

    /// Directory backing this storage.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir
            .join(format!("{}.{}", hex::encode(digest), FILE_EXTENSION))
    }

    fn read_envelope(path: &Path) -> StorageResult<Option<StoredItem>> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn used_bytes(&self) -> StorageResult<u64> {
        let mut total = 0;
        for dir_entry in fs::read_dir(&self.dir)? {
            let metadata = dir_entry?.metadata()?;
            if metadata.is_file() {
                total += metadata.len();
            }
        }
        Ok(total)
    }
}

impl DurableStorage for FileStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(Self::read_envelope(&self.path_for(key))?
            .filter(|item| item.key == key)
            .map(|item| item.value))
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        let contents = serde_json::to_string(&StoredItemRef { key, value })?;

        if let Some(quota) = self.quota_bytes {
            let existing = match fs::metadata(&path) {
                Ok(metadata) => metadata.len(),
                Err(err) if err.kind() == ErrorKind::NotFound => 0,
                Err(err) => return Err(err.into()),
            };
            let projected = self.used_bytes()?.saturating_sub(existing) + contents.len() as u64;
            if projected > quota {
                return Err(StorageError::QuotaExceeded(format!(
                    "writing '{}' needs {} bytes, quota is {}",
                    key, projected, quota
                )));
            }
        }

        fs::write(path, contents)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        for dir_entry in fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            // Foreign or damaged files are not ours to list
            if let Ok(Some(item)) = Self::read_envelope(&path) {
                keys.push(item.key);
            }
        }
        Ok(keys)
    }
}

// == Memory Storage ==
/// In-process storage with an optional quota and an availability switch.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
    unavailable: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage rejecting writes once stored values exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Makes every subsequent operation fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn items(&self) -> StorageResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory storage disabled".into()));
        }
        self.items
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".into()))
    }
}

impl DurableStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut items = self.items()?;

        if let Some(quota) = self.quota_bytes {
            let used: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if used + value.len() > quota {
                return Err(StorageError::QuotaExceeded(format!(
                    "writing '{}' needs {} bytes, quota is {}",
                    key,
                    used + value.len(),
                    quota
                )));
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.items()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.items()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        storage.set_item("cache_plan_a", "1").unwrap();

        assert_eq!(storage.get_item("cache_plan_a").unwrap().as_deref(), Some("1"));
        assert_eq!(storage.get_item("missing").unwrap(), None);

        storage.remove_item("cache_plan_a").unwrap();
        storage.remove_item("cache_plan_a").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_memory_storage_quota() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("a", "12345").unwrap();
        // Overwriting the same key only counts the new value
        storage.set_item("a", "1234567890").unwrap();

        let result = storage.set_item("b", "1");
        assert!(matches!(result, Err(StorageError::QuotaExceeded(_))));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_memory_storage_unavailable() {
        let storage = MemoryStorage::new();
        storage.set_unavailable(true);

        assert!(matches!(
            storage.set_item("a", "1"),
            Err(StorageError::Unavailable(_))
        ));
        assert!(storage.keys().is_err());

        storage.set_unavailable(false);
        assert!(storage.set_item("a", "1").is_ok());
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path(), None).unwrap();

        storage.set_item("cache_user_user_profile_1", "{\"a\":1}").unwrap();
        storage.set_item("key with / slashes", "x").unwrap();

        assert_eq!(
            storage.get_item("cache_user_user_profile_1").unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert_eq!(
            storage.get_item("key with / slashes").unwrap().as_deref(),
            Some("x")
        );

        let mut keys = storage.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["cache_user_user_profile_1", "key with / slashes"]);

        storage.remove_item("key with / slashes").unwrap();
        storage.remove_item("key with / slashes").unwrap();
        assert_eq!(storage.get_item("key with / slashes").unwrap(), None);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let storage = FileStorage::open(dir.path(), None).unwrap();
            storage.set_item("k", "v").unwrap();
        }

        let storage = FileStorage::open(dir.path(), None).unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_file_storage_quota() {
        let dir = tempfile::tempdir().unwrap();
        // {"key":"a","value":"12345678"} is 30 bytes
        let storage = FileStorage::open(dir.path(), Some(40)).unwrap();

        storage.set_item("a", "1234").unwrap();
        // Overwriting the same key only counts the new file
        storage.set_item("a", "12345678").unwrap();

        let result = storage.set_item("b", "1");
        assert!(matches!(result, Err(StorageError::QuotaExceeded(_))));
        assert_eq!(storage.keys().unwrap(), vec!["a".to_string()]);
    }

    #[test]
    fn test_file_storage_long_keys() {
        let dir = tempfile::tempdir().unwrap();
        let key = format!("cache_plan_user_plans_{}", "x".repeat(200));
        {
            let storage = FileStorage::open(dir.path(), None).unwrap();
            storage.set_item(&key, "[1,2]").unwrap();
        }

        let storage = FileStorage::open(dir.path(), None).unwrap();
        assert_eq!(storage.get_item(&key).unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(storage.keys().unwrap(), vec![key.clone()]);

        storage.remove_item(&key).unwrap();
        assert!(storage.keys().unwrap().is_empty());
    }

    #[test]
    fn test_file_storage_ignores_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.txt"), "not a key").unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();

        let storage = FileStorage::open(dir.path(), None).unwrap();
        storage.set_item("k", "v").unwrap();

        assert_eq!(storage.keys().unwrap(), vec!["k".to_string()]);
    }
}
