//! LRU Ordering Module
//!
//! Recency is a logical clock stamp on each entry rather than a linked list.
//! Least-recently-used order is recovered on demand by sorting live entries,
//! which only happens during an eviction sweep or an ordered snapshot.

use std::collections::HashMap;

use crate::cache::CacheEntry;

// == Recency Clock ==
/// Monotonic logical clock handing out recency stamps.
///
/// Stamps are never reused, so every live entry carries a distinct recency.
#[derive(Debug, Default, Clone)]
pub struct RecencyClock {
    next: u64,
}

impl RecencyClock {
    // == Constructor ==
    /// Creates a clock starting at zero.
    pub fn new() -> Self {
        Self { next: 0 }
    }

    // == Tick ==
    /// Returns the current stamp and advances the clock by one.
    pub fn tick(&mut self) -> u64 {
        let stamp = self.next;
        self.next += 1;
        stamp
    }

    // == Now ==
    /// The stamp the next tick will hand out.
    #[cfg(test)]
    pub(crate) fn now(&self) -> u64 {
        self.next
    }
}

// == Oldest First ==
/// Returns all entries ordered by ascending recency (least recently used first).
///
/// O(n log n) in the number of live entries.
pub fn oldest_first<K, V>(entries: &HashMap<K, CacheEntry<V>>) -> Vec<(&K, &CacheEntry<V>)> {
    let mut ordered: Vec<_> = entries.iter().collect();
    ordered.sort_unstable_by_key(|(_, entry)| entry.recency);
    ordered
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_starts_at_zero() {
        let clock = RecencyClock::new();
        assert_eq!(clock.now(), 0);
    }

    #[test]
    fn test_clock_tick_is_monotonic() {
        let mut clock = RecencyClock::new();

        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.tick(), 1);
        assert_eq!(clock.tick(), 2);
        assert_eq!(clock.now(), 3);
    }

    #[test]
    fn test_oldest_first_empty() {
        let entries: HashMap<&str, CacheEntry<u32>> = HashMap::new();
        assert!(oldest_first(&entries).is_empty());
    }

    #[test]
    fn test_oldest_first_orders_by_recency_not_key() {
        let mut entries = HashMap::new();
        entries.insert("a", CacheEntry::new(1, 0, 5));
        entries.insert("b", CacheEntry::new(2, 0, 1));
        entries.insert("c", CacheEntry::new(3, 0, 9));
        entries.insert("d", CacheEntry::new(4, 0, 3));

        let keys: Vec<&str> = oldest_first(&entries).into_iter().map(|(k, _)| *k).collect();

        assert_eq!(keys, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_oldest_first_after_touch() {
        let mut clock = RecencyClock::new();
        let mut entries = HashMap::new();
        entries.insert("a", CacheEntry::new((), 0, clock.tick()));
        entries.insert("b", CacheEntry::new((), 0, clock.tick()));
        entries.insert("c", CacheEntry::new((), 0, clock.tick()));

        // Touch 'a' so it becomes the newest
        entries.get_mut("a").unwrap().touch(clock.tick());

        let keys: Vec<&str> = oldest_first(&entries).into_iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["b", "c", "a"]);
    }
}
