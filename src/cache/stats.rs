//! Cache Statistics Module
//!
//! Tracks per-store metrics: size, approximate memory usage, hits, misses
//! and evictions.

use serde::Serialize;

// == Store Stats ==
/// Snapshot of a single store's metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreStats {
    /// Current number of entries held in memory
    pub size: usize,
    /// Approximate bytes used, counting two bytes per character
    pub memory_usage: usize,
    /// Number of reads that returned a value
    pub hits: u64,
    /// Number of reads that found nothing valid
    pub misses: u64,
    /// Number of entries evicted by the memory bound
    pub evictions: u64,
    /// hits / (hits + misses), 0.0 before any read
    pub hit_rate: f64,
}

impl StoreStats {
    // == Constructor ==
    /// Creates a new StoreStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
        self.refresh_hit_rate();
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses += 1;
        self.refresh_hit_rate();
    }

    // == Record Eviction ==
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Merge ==
    /// Adds another snapshot into this one, recomputing the hit rate from
    /// the summed counters.
    pub fn merge(&mut self, other: &StoreStats) {
        self.size += other.size;
        self.memory_usage += other.memory_usage;
        self.hits += other.hits;
        self.misses += other.misses;
        self.evictions += other.evictions;
        self.refresh_hit_rate();
    }

    fn refresh_hit_rate(&mut self) {
        let total = self.hits + self.misses;
        self.hit_rate = if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        };
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = StoreStats::new();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.hit_rate, 0.0);
    }

    #[test]
    fn test_hit_rate() {
        let mut stats = StoreStats::new();
        for _ in 0..3 {
            stats.record_hit();
        }
        stats.record_miss();

        assert!((stats.hit_rate - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_merge() {
        let mut total = StoreStats::new();
        let a = StoreStats {
            size: 2,
            memory_usage: 100,
            hits: 1,
            misses: 1,
            evictions: 0,
            hit_rate: 0.5,
        };
        let b = StoreStats {
            size: 3,
            memory_usage: 50,
            hits: 2,
            misses: 0,
            evictions: 4,
            hit_rate: 1.0,
        };

        total.merge(&a);
        total.merge(&b);

        assert_eq!(total.size, 5);
        assert_eq!(total.memory_usage, 150);
        assert_eq!(total.evictions, 4);
        assert!((total.hit_rate - 0.75).abs() < 0.001);
    }
}
