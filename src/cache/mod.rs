//! Stale-while-revalidate caching over a single upstream-backed value type:
//! an entry ([`entity::CacheEntry`]) carrying two timestamps, a pluggable
//! freshness policy ([`status::StatusChecker`]), and the cache itself
//! ([`info_service::InformationCache`]) which classifies a read, returns
//! immediately, and dispatches a background refresh through a
//! [`crate::worker_pool::WorkerPool`] when the stored value is stale or
//! missing.

mod entity;
mod info_service;
mod status;

pub use entity::CacheEntry;
pub use info_service::{ErrorHandler, InformationCache, Updater};
pub use status::{DailyStatusChecker, IntervalStatusChecker, ItemStatus, StatusChecker};
