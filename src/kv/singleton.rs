use std::sync::RwLock;

use super::KvRepo;

/// A degenerate store that ignores the key and holds a single value.
///
/// Used by the public (singleton) cache entries — teaching calendar,
/// today's/tomorrow's classroom availability — where every caller id
/// resolves to the same underlying slot.
pub struct StaticRepo<V> {
    value: RwLock<Option<V>>,
}

impl<V: Clone> StaticRepo<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: RwLock::new(None),
        }
    }
}

impl<V: Clone> Default for StaticRepo<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V: Clone> KvRepo<K, V> for StaticRepo<V> {
    fn get(&self, _key: &K) -> Option<V> {
        self.value.read().expect("singleton lock poisoned").clone()
    }

    fn set(&self, _key: K, value: V) {
        *self.value.write().expect("singleton lock poisoned") = Some(value);
    }

    fn delete(&self, _key: &K) -> bool {
        self.value.write().expect("singleton lock poisoned").take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_key_resolves_to_same_value() {
        let repo: StaticRepo<i32> = StaticRepo::new();
        repo.set("ignored-key", 42);
        assert_eq!(KvRepo::get(&repo, &"other-key"), Some(42));
    }

    #[test]
    fn empty_singleton_is_none() {
        let repo: StaticRepo<i32> = StaticRepo::new();
        assert_eq!(KvRepo::get(&repo, &"k"), None);
    }
}
