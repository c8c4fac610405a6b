//! Background Tasks Module
//!
//! Contains background tasks that run periodically for the process lifetime.
//!
//! # Tasks
//! - Monitor: purges invalid entries and runs the cache health check

mod monitor;

pub use monitor::{spawn_monitor_task, DEFAULT_MONITOR_INTERVAL};
