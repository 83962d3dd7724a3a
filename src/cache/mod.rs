//! Cache Module
//!
//! Provides an in-memory LRU cache bounded by total cost and entry count.

mod concurrent;
mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use concurrent::LruCache;
pub use entry::CacheEntry;
pub use lru::RecencyClock;
pub use stats::CacheStats;
pub use store::CacheStore;
