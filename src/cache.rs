//! Bounded FIFO cache for recently-seen pairs
//!
//! Keeps the last known value per key with oldest-insertion eviction once the
//! size cap is exceeded. Eviction is by insertion order, not access order.
//! The cache is owned by the monitor task; a multi-threaded caller must wrap
//! it in a mutex.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Fixed-capacity insertion-order cache
#[derive(Debug)]
pub struct FifoCache<K, V> {
    map: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: Eq + Hash + Clone, V> FifoCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity.min(1024)),
            order: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
        }
    }

    /// Insert or update a value.
    ///
    /// Updating an existing key keeps its original insertion slot; only a
    /// brand-new key can trigger eviction of the oldest entry.
    pub fn insert(&mut self, key: K, value: V) {
        if self.map.insert(key.clone(), value).is_none() {
            self.order.push_back(key);
            if self.order.len() > self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.map.remove(&oldest);
                }
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut cache = FifoCache::new(4);
        cache.insert("BTCUSDT", 50_000.0);
        cache.insert("ETHUSDT", 3_000.0);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"BTCUSDT"), Some(&50_000.0));
        assert!(!cache.contains(&"SOLUSDT"));
    }

    #[test]
    fn test_evicts_oldest_insertion_first() {
        let mut cache = FifoCache::new(3);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);
        cache.insert("d", 4);

        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(&"a"));
        assert!(cache.contains(&"b"));
        assert!(cache.contains(&"d"));
    }

    #[test]
    fn test_update_does_not_refresh_slot() {
        let mut cache = FifoCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        // Updating "a" must not move it to the back of the eviction queue
        cache.insert("a", 10);
        cache.insert("c", 3);

        assert!(!cache.contains(&"a"));
        assert_eq!(cache.get(&"b"), Some(&2));
        assert_eq!(cache.get(&"c"), Some(&3));
    }
}
