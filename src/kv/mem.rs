use dashmap::DashMap;
use std::hash::Hash;

use super::KvRepo;

/// In-memory, concurrency-safe key-value store. `DashMap` gives
/// reader-concurrent, writer-exclusive behavior per shard without a
/// single crate-wide lock.
pub struct MemRepo<K, V> {
    items: DashMap<K, V>,
}

impl<K, V> MemRepo<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }
}

impl<K, V> Default for MemRepo<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> KvRepo<K, V> for MemRepo<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn get(&self, key: &K) -> Option<V> {
        self.items.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: K, value: V) {
        self.items.insert(key, value);
    }

    fn delete(&self, key: &K) -> bool {
        self.items.remove(key).is_some()
    }
}
