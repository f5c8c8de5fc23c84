use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::Utc;

use crate::errors::AppError;
use crate::kv::{KvRepo, MemRepo, StaticRepo};
use crate::worker_pool::WorkerPool;

use super::entity::CacheEntry;
use super::status::{ItemStatus, StatusChecker};

/// The refresh function bound to a cache: given the key, asynchronously
/// produces a fresh value or an error.
pub type Updater<V> =
    Arc<dyn Fn(String) -> Pin<Box<dyn Future<Output = Result<V, AppError>> + Send>> + Send + Sync>;

/// Invoked with `(key, err)` when a refresh fails; errors never propagate to
/// the reader, who always sees stale-or-placeholder data instead.
pub type ErrorHandler = Arc<dyn Fn(&str, &AppError) + Send + Sync>;

/// Stale-while-revalidate cache over a single value type `V`.
///
/// `Clone` is cheap: every field is an `Arc`, so a cache can be handed to an
/// async refresh task without lifetime gymnastics.
#[derive(Clone)]
pub struct InformationCache<V> {
    items: Arc<dyn KvRepo<String, CacheEntry<V>> + Send + Sync>,
    checker: Arc<dyn StatusChecker<V>>,
    updater: Updater<V>,
    pool: Arc<WorkerPool>,
    on_error: ErrorHandler,
}

fn default_error_handler() -> ErrorHandler {
    Arc::new(|key: &str, err: &AppError| {
        tracing::warn!(key, error = %err, "cache refresh failed");
    })
}

impl<V> InformationCache<V>
where
    V: Clone + Default + Send + Sync + 'static,
{
    /// Personal shape: one entry per key (student id), backed by an
    /// in-memory map.
    #[must_use]
    pub fn personal(
        checker: Arc<dyn StatusChecker<V>>,
        updater: Updater<V>,
        pool: Arc<WorkerPool>,
    ) -> Self {
        Self {
            items: Arc::new(MemRepo::new()),
            checker,
            updater,
            pool,
            on_error: default_error_handler(),
        }
    }

    /// Public shape: a single entry shared by every key, used for the
    /// teaching calendar and classroom availability endpoints. The "key"
    /// passed to `get`/the updater still identifies which student's
    /// credentials to authenticate with upstream, but there is only ever
    /// one stored entry.
    #[must_use]
    pub fn public(
        checker: Arc<dyn StatusChecker<V>>,
        updater: Updater<V>,
        pool: Arc<WorkerPool>,
    ) -> Self {
        Self {
            items: Arc::new(StaticRepo::new()),
            checker,
            updater,
            pool,
            on_error: default_error_handler(),
        }
    }

    /// `Get(key) -> (value, fresh)`. Never blocks on upstream: on a stale or
    /// missing read it stamps `submit_at` and dispatches a background
    /// refresh, then returns immediately with whatever is stored (the zero
    /// value if nothing ever was).
    pub fn get(&self, key: &str) -> (V, bool) {
        let now = Utc::now();
        let existing = self.items.get(&key.to_string());
        let status = self.checker.status_of(existing.as_ref());
        let fresh = status == ItemStatus::Valid;
        let data = existing
            .as_ref()
            .map(|item| item.data.clone())
            .unwrap_or_default();

        if matches!(status, ItemStatus::Expired | ItemStatus::NotFound) {
            let mut item = existing.unwrap_or_else(|| CacheEntry::placeholder(now));
            item.submit_at = now;
            self.items.set(key.to_string(), item);
            self.submit_refresh(key.to_string());
        }

        (data, fresh)
    }

    /// Replace the stored value and bump `update_at`. Preserves the prior
    /// `submit_at` so an out-of-order refresh result can't retroactively
    /// make the classifier think a newer refresh is in flight.
    pub fn set(&self, key: &str, value: V) {
        let now = Utc::now();
        let existing = self.items.get(&key.to_string());
        let submit_at = existing.map_or(now, |item| item.submit_at);
        self.items.set(
            key.to_string(),
            CacheEntry {
                data: value,
                update_at: now,
                submit_at,
            },
        );
    }

    fn submit_refresh(&self, key: String) {
        let cache = self.clone();
        self.pool.submit(async move {
            match (cache.updater)(key.clone()).await {
                Ok(value) => cache.set(&key, value),
                Err(err) => (cache.on_error)(&key, &err),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::status::IntervalStatusChecker;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn updater_returning(value: &'static str, calls: Arc<AtomicUsize>) -> Updater<String> {
        Arc::new(move |_key: String| {
            let calls = Arc::clone(&calls);
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(value.to_string())
            })
        })
    }

    fn failing_updater(calls: Arc<AtomicUsize>) -> Updater<String> {
        Arc::new(move |_key: String| {
            let calls = Arc::clone(&calls);
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AppError::ServiceUnavailable)
            })
        })
    }

    #[tokio::test]
    async fn cold_read_kicks_refresh() {
        let pool = Arc::new(WorkerPool::new(2));
        let checker: Arc<dyn StatusChecker<String>> =
            Arc::new(IntervalStatusChecker::new(Duration::seconds(2), Duration::seconds(3)));
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = InformationCache::personal(checker, updater_returning("v1", calls), pool.clone());

        let (value, fresh) = cache.get("k");
        assert_eq!(value, "");
        assert!(!fresh);

        pool.wait().await;

        let (value, fresh) = cache.get("k");
        assert_eq!(value, "v1");
        assert!(fresh);
    }

    #[tokio::test]
    async fn stale_read_returns_old_value_then_refreshes() {
        let pool = Arc::new(WorkerPool::new(2));
        let checker: Arc<dyn StatusChecker<String>> =
            Arc::new(IntervalStatusChecker::new(Duration::seconds(2), Duration::seconds(3)));
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = InformationCache::personal(checker, updater_returning("new", calls), pool.clone());

        let old_time = Utc::now() - Duration::seconds(10);
        cache.items.set(
            "k".to_string(),
            CacheEntry {
                data: "old".to_string(),
                update_at: old_time,
                submit_at: old_time,
            },
        );

        let (value, fresh) = cache.get("k");
        assert_eq!(value, "old");
        assert!(!fresh);

        pool.wait().await;

        let (value, fresh) = cache.get("k");
        assert_eq!(value, "new");
        assert!(fresh);
    }

    #[tokio::test]
    async fn update_failure_keeps_stale_and_does_not_double_dispatch() {
        let pool = Arc::new(WorkerPool::new(2));
        let checker: Arc<dyn StatusChecker<String>> =
            Arc::new(IntervalStatusChecker::new(Duration::seconds(2), Duration::seconds(30)));
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = InformationCache::personal(checker, failing_updater(Arc::clone(&calls)), pool.clone());

        let old_time = Utc::now() - Duration::seconds(10);
        cache.items.set(
            "k".to_string(),
            CacheEntry {
                data: "old".to_string(),
                update_at: old_time,
                submit_at: old_time,
            },
        );

        let (value, fresh) = cache.get("k");
        assert_eq!(value, "old");
        assert!(!fresh);
        pool.wait().await;

        // Immediate re-read: classifier now reports Updating (submit_at was
        // just stamped), so no second refresh is dispatched.
        let (value, fresh) = cache.get("k");
        assert_eq!(value, "old");
        assert!(!fresh);
        pool.wait().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn single_flight_burst_dispatches_but_converges() {
        let pool = Arc::new(WorkerPool::new(4));
        let checker: Arc<dyn StatusChecker<String>> =
            Arc::new(IntervalStatusChecker::new(Duration::seconds(2), Duration::seconds(30)));
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = InformationCache::personal(checker, updater_returning("v", Arc::clone(&calls)), pool.clone());

        for _ in 0..5 {
            cache.get("k");
        }
        pool.wait().await;

        let (value, fresh) = cache.get("k");
        assert_eq!(value, "v");
        assert!(fresh);
        assert!(calls.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn public_cache_shares_one_entry_across_keys() {
        let pool = Arc::new(WorkerPool::new(2));
        let checker: Arc<dyn StatusChecker<String>> =
            Arc::new(IntervalStatusChecker::new(Duration::seconds(60), Duration::seconds(3)));
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = InformationCache::public(checker, updater_returning("calendar", calls), pool.clone());

        cache.get("student-a");
        pool.wait().await;

        let (value, fresh) = cache.get("student-b");
        assert_eq!(value, "calendar");
        assert!(fresh);
    }
}
