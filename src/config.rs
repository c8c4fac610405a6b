//! Configuration Module
//!
//! Handles loading and managing runtime configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Directory backing the durable mirror
    pub cache_dir: PathBuf,
    /// Byte quota for the durable mirror, None = unlimited
    pub cache_quota_bytes: Option<u64>,
    /// Interval in seconds between health checks
    pub health_check_interval: u64,
    /// Mounts the debug routes when true
    pub debug: bool,
    /// Base URL of the JSON data backend, None = no data source
    pub data_api_url: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_DIR` - Durable mirror directory (default: `.lifecache`)
    /// - `CACHE_QUOTA_BYTES` - Durable mirror quota, 0 disables it (default: 5 MiB)
    /// - `HEALTH_CHECK_INTERVAL` - Health check frequency in seconds (default: 300)
    /// - `CACHE_DEBUG` - `1`/`true` mounts the debug routes (default: false)
    /// - `DATA_API_URL` - Data backend base URL (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            cache_dir: env::var("CACHE_DIR")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            cache_quota_bytes: match env::var("CACHE_QUOTA_BYTES")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
            {
                Some(0) => None,
                Some(bytes) => Some(bytes),
                None => defaults.cache_quota_bytes,
            },
            health_check_interval: env::var("HEALTH_CHECK_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.health_check_interval),
            debug: env::var("CACHE_DEBUG")
                .ok()
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.debug),
            data_api_url: env::var("DATA_API_URL").ok().filter(|v| !v.is_empty()),
        }
    }

    /// Health check interval as a Duration.
    pub fn health_check_period(&self) -> Duration {
        Duration::from_secs(self.health_check_interval.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_dir: PathBuf::from(".lifecache"),
            cache_quota_bytes: Some(5 * 1024 * 1024),
            health_check_interval: 300,
            debug: false,
            data_api_url: None,
        }
    }
}
