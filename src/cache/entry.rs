//! Cache Entry Module
//!
//! Defines the record stored for each live key.

// == Cache Entry ==
/// A single cache entry: the value plus its cost and recency stamp.
///
/// The key lives in the owning map; an entry is mutated in place when its key
/// is set again or read.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Caller-assigned weight, may be zero or negative
    pub cost: i64,
    /// Logical clock stamp of the last insert, update or read
    pub recency: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped with `recency`.
    pub fn new(value: V, cost: i64, recency: u64) -> Self {
        Self {
            value,
            cost,
            recency,
        }
    }

    // == Replace ==
    /// Installs a new value and cost, restamping recency.
    ///
    /// Returns the previous cost so the caller can correct its running total.
    pub fn replace(&mut self, value: V, cost: i64, recency: u64) -> i64 {
        self.value = value;
        self.recency = recency;
        std::mem::replace(&mut self.cost, cost)
    }

    // == Touch ==
    /// Marks the entry as used at `recency`.
    pub fn touch(&mut self, recency: u64) {
        self.recency = recency;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("value", 3, 7);

        assert_eq!(entry.value, "value");
        assert_eq!(entry.cost, 3);
        assert_eq!(entry.recency, 7);
    }

    #[test]
    fn test_entry_replace_returns_old_cost() {
        let mut entry = CacheEntry::new("old", 5, 0);

        let old_cost = entry.replace("new", -2, 4);

        assert_eq!(old_cost, 5);
        assert_eq!(entry.value, "new");
        assert_eq!(entry.cost, -2);
        assert_eq!(entry.recency, 4);
    }

    #[test]
    fn test_entry_touch_keeps_payload() {
        let mut entry = CacheEntry::new(10u32, 1, 0);

        entry.touch(9);

        assert_eq!(entry.value, 10);
        assert_eq!(entry.cost, 1);
        assert_eq!(entry.recency, 9);
    }
}
