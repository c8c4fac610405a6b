//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and version tags.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// This is also the JSON document written to durable storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Creation timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// Store version at write time
    pub version: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` from now.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Time to live; zero produces an entry that is already expired
    /// * `version` - Current version of the owning store
    pub fn new(value: Value, ttl: Duration, version: u64) -> Self {
        let now = current_timestamp_ms();
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);

        Self {
            value,
            stored_at: now,
            expires_at: now.saturating_add(ttl_ms),
            version,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration time.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }

    // == Is Valid ==
    /// An entry is valid iff it carries the store's current version and has
    /// not expired.
    pub fn is_valid(&self, current_version: u64) -> bool {
        self.version == current_version && !self.is_expired()
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new(json!("test_value"), Duration::from_secs(60), 1);

        assert_eq!(entry.value, json!("test_value"));
        assert_eq!(entry.expires_at - entry.stored_at, 60_000);
        assert_eq!(entry.version, 1);
        assert!(entry.is_valid(1));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(json!(1), Duration::from_millis(50), 1);

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(80));

        assert!(entry.is_expired());
        assert!(!entry.is_valid(1));
    }

    #[test]
    fn test_zero_ttl_is_already_expired() {
        let entry = CacheEntry::new(json!(1), Duration::ZERO, 1);
        assert!(entry.is_expired());
        assert!(!entry.is_valid(1));
    }

    #[test]
    fn test_version_mismatch_is_invalid() {
        let entry = CacheEntry::new(json!(1), Duration::from_secs(60), 1);
        assert!(!entry.is_valid(2));
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new(json!(1), Duration::from_secs(10), 1);

        let remaining = entry.ttl_remaining_ms();
        assert!(remaining <= 10_000);
        assert!(remaining >= 9_000);
    }

    #[test]
    fn test_ttl_remaining_expired() {
        let entry = CacheEntry::new(json!(1), Duration::ZERO, 1);
        assert_eq!(entry.ttl_remaining_ms(), 0);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CacheEntry::new(json!(1), Duration::MAX, 1);
        assert_eq!(entry.expires_at, u64::MAX);
        assert!(entry.is_valid(1));
    }

    #[test]
    fn test_entry_json_field_names() {
        let entry = CacheEntry {
            value: json!({"title": "Trip"}),
            stored_at: 10,
            expires_at: 20,
            version: 3,
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["storedAt"], 10);
        assert_eq!(json["expiresAt"], 20);
        assert_eq!(json["version"], 3);
        assert_eq!(json["value"]["title"], "Trip");
    }
}
