//! Fixed calendar-event defaults and the listen port.

use chrono::Duration;

use crate::icalendar::Alarm;

pub const API_PORT: u16 = 8080;
pub const PROD_ID: &str = "-//sky31studio//GongGong//CN";

pub const COURSE_SUMMARY_PREFIX: &str = "【课程】";
pub const COURSE_DESC_SUFFIX: &str = "【拱拱】";
pub const EXAM_SUMMARY_PREFIX: &str = "【考试】";
pub const EXAM_DESC_SUFFIX: &str = "【拱拱】";

/// Default worker pool concurrency.
pub const DEFAULT_WORKER_POOL_SIZE: usize = 10;

/// Personal (per-student) cache entries: how long a successful refresh is
/// considered fresh before the next read dispatches another one.
#[must_use]
pub fn personal_update_ttl() -> Duration {
    Duration::minutes(5)
}

/// Personal cache entries: once a refresh has been dispatched, how long
/// reads are classified `Updating` (single-flight window) before another
/// is allowed.
#[must_use]
pub fn personal_submit_ttl() -> Duration {
    Duration::seconds(30)
}

/// Public (singleton) cache entries — teaching calendar, classroom
/// availability — use the daily policy; this is only the `Updating`
/// window after a dispatch, not the freshness window (that's "today").
#[must_use]
pub fn public_submit_ttl() -> Duration {
    Duration::minutes(5)
}

/// Persistence location for the account store's two file-mirrored
/// snapshots.
pub const ACCOUNT_ID_SNAPSHOT_PATH: &str = "./_data/account_id.bin";
pub const ACCOUNT_TOKEN_SNAPSHOT_PATH: &str = "./_data/account_token.bin";

/// Reminder fired 28 minutes before a course's first period.
#[must_use]
pub fn default_course_alarms() -> Vec<Alarm> {
    vec![Alarm::new(
        "DISPLAY",
        Duration::minutes(28),
        "距离上课仅剩28分钟",
    )]
}

/// Reminders fired 1 hour, 1 day, and 7 days before an exam.
#[must_use]
pub fn default_exam_alarms() -> Vec<Alarm> {
    vec![
        Alarm::new("DISPLAY", Duration::hours(1), "距离考试仅剩1小时"),
        Alarm::new("DISPLAY", Duration::hours(24), "距离考试仅剩1天"),
        Alarm::new("DISPLAY", Duration::days(7), "距离考试仅剩7天"),
    ]
}
