//! Thread-Safe Cache Module
//!
//! Wraps [`CacheStore`] in a single mutex and subscribes it to a
//! memory-pressure source.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::pressure::{MemoryPressureSource, PressureHandler, PressureNotifier, Subscription};

// == LRU Cache ==
/// A thread-safe LRU cache bounded by total cost and entry count.
///
/// Every operation takes one lock for its whole read/modify/write sequence.
/// Inserts and limit changes release it before running the eviction sweep
/// under a second acquisition, so other callers can interleave between an
/// insert and the sweep that follows it.
///
/// Share between threads with `Arc<LruCache<K, V>>`.
///
/// # Example
/// ```
/// use cost_lru::LruCache;
///
/// let cache = LruCache::new(i64::MAX, 3);
/// for i in 0..4 {
///     cache.set(i, i * 10);
/// }
/// // The sweep runs down to half the count limit
/// assert_eq!(cache.ordered_keys(), vec![3]);
/// ```
pub struct LruCache<K, V> {
    /// Dropped before `state`, so no signal reaches a cache being torn down
    subscription: Subscription,
    state: Arc<Mutex<CacheStore<K, V>>>,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    // == Constructors ==
    /// Creates a cache with the given limits, subscribed to the shared
    /// [`PressureNotifier`].
    pub fn new(cost_limit: i64, count_limit: i64) -> Self {
        Self::with_pressure_source(cost_limit, count_limit, PressureNotifier::shared())
    }

    /// Creates a cache with no cost or count limit.
    pub fn unbounded() -> Self {
        Self::new(i64::MAX, i64::MAX)
    }

    /// Creates a cache with the limits from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cost_limit, config.count_limit)
    }

    /// Creates a cache that clears itself whenever `source` signals pressure.
    pub fn with_pressure_source(
        cost_limit: i64,
        count_limit: i64,
        source: Arc<dyn MemoryPressureSource>,
    ) -> Self {
        let state = Arc::new(Mutex::new(CacheStore::new(cost_limit, count_limit)));

        let weak = Arc::downgrade(&state);
        let handler: PressureHandler = Arc::new(move || {
            if let Some(state) = weak.upgrade() {
                let mut store = state.lock();
                let cleared = store.len();
                store.clear_for_pressure();
                info!(cleared, "Cleared cache on memory pressure");
            }
        });

        Self {
            subscription: Subscription::register(source, handler),
            state,
        }
    }
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Set ==
    /// Inserts or updates `key` with a cost of zero.
    pub fn set(&self, key: K, value: V) {
        self.set_with_cost(key, value, 0);
    }

    /// Inserts or updates `key` with the given cost, then enforces limits.
    ///
    /// The key becomes the most recently used. Enforcing limits may evict
    /// other keys.
    pub fn set_with_cost(&self, key: K, value: V, cost: i64) {
        self.state.lock().insert(key, value, cost);
        self.evict();
    }

    /// Inserts `Some(value)` like [`LruCache::set_with_cost`]; `None` removes
    /// the key instead.
    pub fn set_value(&self, key: K, value: Option<V>, cost: i64) {
        match value {
            Some(value) => self.set_with_cost(key, value, cost),
            None => {
                self.remove(&key);
            }
        }
    }

    // == Get ==
    /// Returns a clone of the value and marks the key as most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.state.lock().get(key).cloned()
    }

    /// Returns a clone of the value without affecting eviction order.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.state.lock().peek(key).cloned()
    }

    /// Checks for a key without affecting eviction order.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.lock().contains(key)
    }

    // == Remove ==
    /// Removes a key and returns its value, if it was present.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.lock().remove(key)
    }

    // == Clear ==
    /// Removes all entries and resets the total cost.
    pub fn clear(&self) {
        self.state.lock().clear();
    }

    // == Limits ==
    /// Returns the current total cost limit.
    pub fn cost_limit(&self) -> i64 {
        self.state.lock().cost_limit()
    }

    /// Returns the current entry count limit.
    pub fn count_limit(&self) -> i64 {
        self.state.lock().count_limit()
    }

    /// Changes the cost limit. Lowering it evicts immediately.
    pub fn set_cost_limit(&self, limit: i64) {
        self.state.lock().set_cost_limit(limit);
        self.evict();
    }

    /// Changes the count limit. Lowering it evicts immediately.
    pub fn set_count_limit(&self, limit: i64) {
        self.state.lock().set_count_limit(limit);
        self.evict();
    }

    // == Snapshots ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.state.lock().is_empty()
    }

    /// Sum of the costs of all live entries.
    pub fn total_cost(&self) -> i128 {
        self.state.lock().total_cost()
    }

    /// All keys, in no particular order.
    pub fn keys(&self) -> Vec<K> {
        self.state.lock().keys().cloned().collect()
    }

    /// All values, in no particular order.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.state.lock().values().cloned().collect()
    }

    /// Keys from least to most recently used.
    ///
    /// Sorts every entry; intended for inspection, not hot paths.
    pub fn ordered_keys(&self) -> Vec<K> {
        self.state
            .lock()
            .ordered_keys()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Values from least to most recently used.
    pub fn ordered_values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.state
            .lock()
            .ordered_values()
            .into_iter()
            .cloned()
            .collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats()
    }

    fn evict(&self) {
        self.state.lock().evict();
    }
}

impl<K, V> Default for LruCache<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.state.lock();
        f.debug_struct("LruCache")
            .field("subscription", &self.subscription.id())
            .field("len", &store.len())
            .field("total_cost", &store.total_cost())
            .field("cost_limit", &store.cost_limit())
            .field("count_limit", &store.count_limit())
            .finish()
    }
}
