use chrono::{DateTime, Utc};

/// A single cached value plus the two timestamps the staleness classifier
/// reads.
///
/// Invariants: both timestamps are monotonically non-decreasing, and
/// `update_at <= submit_at` once at least one refresh has been submitted.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub data: V,
    pub update_at: DateTime<Utc>,
    pub submit_at: DateTime<Utc>,
}

impl<V: Default> CacheEntry<V> {
    /// A placeholder entry for a key that has never been successfully
    /// refreshed: `update_at` is pinned to the Unix epoch so the classifier
    /// never reports it `Valid`, while `submit_at` is stamped to `now` to
    /// record that a refresh has just been dispatched for it.
    pub fn placeholder(now: DateTime<Utc>) -> Self {
        Self {
            data: V::default(),
            update_at: DateTime::<Utc>::from_timestamp(0, 0).expect("epoch is representable"),
            submit_at: now,
        }
    }
}
