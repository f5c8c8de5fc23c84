use chrono::{DateTime, Datelike, Duration, Utc};

use super::entity::CacheEntry;

/// Freshness classification of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Valid,
    Expired,
    Updating,
    NotFound,
}

/// Maps a cache entry's timestamps to a freshness classification.
///
/// Two concrete policies are provided: `IntervalStatusChecker` and
/// `DailyStatusChecker`.
pub trait StatusChecker<V>: Send + Sync {
    fn status_of(&self, item: Option<&CacheEntry<V>>) -> ItemStatus;
}

/// `(update_ttl, submit_ttl)`-based policy, used for personal per-student
/// entries (info, scores, rank, exams, courses).
pub struct IntervalStatusChecker {
    update_ttl: Duration,
    submit_ttl: Duration,
}

impl IntervalStatusChecker {
    #[must_use]
    pub const fn new(update_ttl: Duration, submit_ttl: Duration) -> Self {
        Self {
            update_ttl,
            submit_ttl,
        }
    }
}

impl<V> StatusChecker<V> for IntervalStatusChecker {
    fn status_of(&self, item: Option<&CacheEntry<V>>) -> ItemStatus {
        let Some(item) = item else {
            return ItemStatus::NotFound;
        };
        let now = Utc::now();
        if now < item.update_at + self.update_ttl {
            ItemStatus::Valid
        } else if now < item.submit_at + self.submit_ttl {
            ItemStatus::Updating
        } else {
            ItemStatus::Expired
        }
    }
}

/// "Valid for the rest of today" policy, used for public entries whose
/// upstream source (teaching calendar, classroom availability) only changes
/// once a calendar day.
pub struct DailyStatusChecker {
    submit_ttl: Duration,
}

impl DailyStatusChecker {
    #[must_use]
    pub const fn new(submit_ttl: Duration) -> Self {
        Self { submit_ttl }
    }
}

impl<V> StatusChecker<V> for DailyStatusChecker {
    fn status_of(&self, item: Option<&CacheEntry<V>>) -> ItemStatus {
        let Some(item) = item else {
            return ItemStatus::NotFound;
        };
        let now = Utc::now();
        if same_local_day(item.update_at, now) {
            ItemStatus::Valid
        } else if now < item.submit_at + self.submit_ttl {
            ItemStatus::Updating
        } else {
            ItemStatus::Expired
        }
    }
}

/// "Local day" is Asia/Shanghai (+08:00), the timezone this system's campus
/// calendar data is published in (see [`crate::icalendar::timezone`]).
fn same_local_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    let offset = Duration::hours(8);
    let a = (a + offset).date_naive();
    let b = (b + offset).date_naive();
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_returns_not_found_on_absent_entry() {
        let checker = IntervalStatusChecker::new(Duration::seconds(2), Duration::seconds(3));
        let status: ItemStatus = StatusChecker::<i32>::status_of(&checker, None);
        assert_eq!(status, ItemStatus::NotFound);
    }

    #[test]
    fn interval_checker_valid_just_after_update() {
        let checker = IntervalStatusChecker::new(Duration::seconds(2), Duration::seconds(3));
        let now = Utc::now();
        let item = CacheEntry {
            data: 1,
            update_at: now,
            submit_at: now,
        };
        assert_eq!(checker.status_of(Some(&item)), ItemStatus::Valid);
    }

    #[test]
    fn interval_checker_updating_after_update_ttl_but_within_submit_ttl() {
        let checker = IntervalStatusChecker::new(Duration::seconds(2), Duration::seconds(30));
        let now = Utc::now();
        let item = CacheEntry {
            data: 1,
            update_at: now - Duration::seconds(10),
            submit_at: now - Duration::seconds(5),
        };
        assert_eq!(checker.status_of(Some(&item)), ItemStatus::Updating);
    }

    #[test]
    fn interval_checker_expired_after_both_ttls() {
        let checker = IntervalStatusChecker::new(Duration::seconds(2), Duration::seconds(3));
        let now = Utc::now();
        let item = CacheEntry {
            data: 1,
            update_at: now - Duration::seconds(10),
            submit_at: now - Duration::seconds(10),
        };
        assert_eq!(checker.status_of(Some(&item)), ItemStatus::Expired);
    }

    #[test]
    fn daily_checker_valid_same_day() {
        let checker = DailyStatusChecker::new(Duration::seconds(30));
        let now = Utc::now();
        let item = CacheEntry {
            data: 1,
            update_at: now,
            submit_at: now,
        };
        assert_eq!(checker.status_of(Some(&item)), ItemStatus::Valid);
    }

    #[test]
    fn daily_checker_expired_after_day_change_and_submit_ttl() {
        let checker = DailyStatusChecker::new(Duration::seconds(1));
        let now = Utc::now();
        let item = CacheEntry {
            data: 1,
            update_at: now - Duration::days(2),
            submit_at: now - Duration::seconds(5),
        };
        assert_eq!(checker.status_of(Some(&item)), ItemStatus::Expired);
    }
}
