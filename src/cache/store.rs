//! Cache Store Module
//!
//! Single-threaded cache engine: HashMap storage, logical-clock recency,
//! running cost total and the dual-limit eviction sweep. [`LruCache`] wraps it
//! in a lock for shared use.
//!
//! [`LruCache`]: crate::cache::LruCache

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use tracing::debug;

use crate::cache::lru::{self, RecencyClock};
use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Cache storage bounded by a total cost limit and an entry count limit.
///
/// Limits are only enforced by [`CacheStore::evict`]; mutators never evict on
/// their own, so callers decide when the sweep runs.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Source of recency stamps
    clock: RecencyClock,
    /// Sum of `cost` over all live entries; wide enough that no number of
    /// `i64` costs can overflow it
    total_cost: i128,
    /// Maximum total cost before a sweep runs
    cost_limit: i64,
    /// Maximum entry count before a sweep runs
    count_limit: i64,
    /// Performance statistics
    stats: CacheStats,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty store with the given limits.
    ///
    /// Use `i64::MAX` for an unbounded limit. Negative limits are accepted.
    pub fn new(cost_limit: i64, count_limit: i64) -> Self {
        Self {
            entries: HashMap::new(),
            clock: RecencyClock::new(),
            total_cost: 0,
            cost_limit,
            count_limit,
            stats: CacheStats::new(),
        }
    }

    // == Insert ==
    /// Inserts a value, or updates the value and cost of an existing key.
    ///
    /// Either way the entry becomes the most recently used and the clock
    /// advances by one. Does not evict.
    pub fn insert(&mut self, key: K, value: V, cost: i64) {
        let recency = self.clock.tick();
        match self.entries.get_mut(&key) {
            Some(entry) => {
                let old_cost = entry.replace(value, cost, recency);
                self.total_cost -= i128::from(old_cost);
            }
            None => {
                self.entries.insert(key, CacheEntry::new(value, cost, recency));
            }
        }
        self.total_cost += i128::from(cost);
    }

    // == Get ==
    /// Retrieves a value and marks it as most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.touch(self.clock.tick());
                self.stats.record_hit();
                Some(&entry.value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Retrieves a value without counting it as a use.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Checks for a key without counting it as a use.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    // == Remove ==
    /// Removes an entry and returns its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.entries.remove(key)?;
        self.total_cost -= i128::from(entry.cost);
        Some(entry.value)
    }

    // == Clear ==
    /// Removes every entry and resets the total cost. The clock keeps running.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_cost = 0;
    }

    /// Clears the store in response to a memory-pressure signal.
    pub fn clear_for_pressure(&mut self) {
        self.clear();
        self.stats.record_pressure_clear();
    }

    // == Limits ==
    /// Returns the current total cost limit.
    pub fn cost_limit(&self) -> i64 {
        self.cost_limit
    }

    /// Returns the current entry count limit.
    pub fn count_limit(&self) -> i64 {
        self.count_limit
    }

    /// Replaces the cost limit. Call [`CacheStore::evict`] afterwards.
    pub fn set_cost_limit(&mut self, limit: i64) {
        debug!(old = self.cost_limit, new = limit, "Cost limit changed");
        self.cost_limit = limit;
    }

    /// Replaces the count limit. Call [`CacheStore::evict`] afterwards.
    pub fn set_count_limit(&mut self, limit: i64) {
        debug!(old = self.count_limit, new = limit, "Count limit changed");
        self.count_limit = limit;
    }

    // == Over Limit ==
    /// True when either limit is currently exceeded.
    pub fn is_over_limit(&self) -> bool {
        self.total_cost > i128::from(self.cost_limit) || self.count() > self.count_limit
    }

    // == Evict ==
    /// Runs an eviction sweep if either limit is exceeded.
    ///
    /// The sweep removes least recently used entries until both the total
    /// cost and the entry count are at or below half of their limits, so a
    /// sort is paid roughly once per half-limit's worth of insertions.
    ///
    /// Returns the number of entries evicted.
    pub fn evict(&mut self) -> usize {
        if !self.is_over_limit() {
            return 0;
        }

        let cost_target = i128::from(self.cost_limit.div_euclid(2));
        let count_target = self.count_limit.div_euclid(2);

        let mut remaining_cost = self.total_cost;
        let mut remaining_count = self.count();
        let mut victims = Vec::new();
        for (key, entry) in lru::oldest_first(&self.entries) {
            if remaining_cost <= cost_target && remaining_count <= count_target {
                break;
            }
            remaining_cost -= i128::from(entry.cost);
            remaining_count -= 1;
            victims.push(key.clone());
        }

        for key in &victims {
            if let Some(entry) = self.entries.remove(key) {
                self.total_cost -= i128::from(entry.cost);
            }
        }

        self.stats.record_evictions(victims.len());
        debug!(
            evicted = victims.len(),
            remaining = self.entries.len(),
            total_cost = %self.total_cost,
            "Eviction sweep complete"
        );
        victims.len()
    }

    // == Snapshots ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of the costs of all live entries.
    pub fn total_cost(&self) -> i128 {
        self.total_cost
    }

    /// Keys in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Values in unspecified order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values().map(|entry| &entry.value)
    }

    /// Keys from least to most recently used. Sorts all entries.
    pub fn ordered_keys(&self) -> Vec<&K> {
        lru::oldest_first(&self.entries)
            .into_iter()
            .map(|(key, _)| key)
            .collect()
    }

    /// Values from least to most recently used. Sorts all entries.
    pub fn ordered_values(&self) -> Vec<&V> {
        lru::oldest_first(&self.entries)
            .into_iter()
            .map(|(_, entry)| &entry.value)
            .collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats.total_cost = self.total_cost;
        stats
    }

    /// The stamp the clock will hand out next.
    #[cfg(test)]
    pub(crate) fn clock_now(&self) -> u64 {
        self.clock.now()
    }

    /// Iterates live entries with their metadata.
    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, &CacheEntry<V>)> {
        self.entries.iter()
    }

    fn count(&self) -> i64 {
        self.entries.len() as i64
    }
}

impl<K, V> Default for CacheStore<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new(i64::MAX, i64::MAX)
    }
}
