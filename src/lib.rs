//! Cost LRU - A thread-safe, cost- and count-bounded LRU cache
//!
//! Entries are evicted least-recently-used first, in batches, whenever the
//! total cost or the entry count exceeds its limit. Caches clear themselves
//! when a memory-pressure signal is delivered.

pub mod cache;
pub mod config;
pub mod error;
pub mod pressure;
pub mod tasks;

pub use cache::{CacheStats, LruCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use pressure::{MemoryPressureSource, PressureNotifier, Subscription};
pub use tasks::spawn_pressure_monitor;
