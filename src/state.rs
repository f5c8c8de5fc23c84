//! Wires the four core subsystems (cache, upstream client, account store,
//! worker pool) into the value the HTTP layer is built over.
//!
//! `AppState::new` is an explicit builder returning one value constructed
//! in dependency order, used as the axum `State` extractor's payload.

use std::sync::Arc;

use crate::account::{AccountRepo, AccountService};
use crate::cache::{DailyStatusChecker, InformationCache, IntervalStatusChecker, StatusChecker};
use crate::config;
use crate::kv::FileRepo;
use crate::orchestrator::update_task;
use crate::upstream::{
    ClassroomStatusTable, CourseList, ExamList, Rank, ScoreBoard, StudentInfo, StudentService,
    TeachingCalendar, UpstreamClient,
};
use crate::worker_pool::WorkerPool;

fn personal_checker<V>() -> Arc<dyn StatusChecker<V>>
where
    V: Send + Sync + 'static,
{
    Arc::new(IntervalStatusChecker::new(
        config::personal_update_ttl(),
        config::personal_submit_ttl(),
    ))
}

fn daily_checker<V>() -> Arc<dyn StatusChecker<V>>
where
    V: Send + Sync + 'static,
{
    Arc::new(DailyStatusChecker::new(config::public_submit_ttl()))
}

/// Shared application state handed to every axum handler.
///
/// Every field is cheap to clone (an `Arc` or an `InformationCache`, which
/// is itself a bundle of `Arc`s) so the whole state can be handed to axum's
/// `State` extractor and to background refresh tasks alike.
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<AccountService>,
    pub student_service: Arc<StudentService>,
    pub worker_pool: Arc<WorkerPool>,
    pub courses: InformationCache<CourseList>,
    pub exams: InformationCache<ExamList>,
    pub info: InformationCache<StudentInfo>,
    pub major_scores: InformationCache<ScoreBoard>,
    pub minor_scores: InformationCache<ScoreBoard>,
    pub compulsory_rank: InformationCache<Rank>,
    pub rank: InformationCache<Rank>,
    pub teaching_calendar: InformationCache<TeachingCalendar>,
    pub classroom_today: InformationCache<ClassroomStatusTable>,
    pub classroom_tomorrow: InformationCache<ClassroomStatusTable>,
}

impl AppState {
    /// Builds every service in dependency order: account store (file
    /// KV-backed) → upstream client → student service → worker pool → one
    /// [`InformationCache`] per cached endpoint, each bound to the
    /// orchestrator's `update_task` for its upstream call.
    #[must_use]
    pub fn new(spider_url: &str, worker_pool_size: usize) -> Arc<Self> {
        let account_repo = AccountRepo::new(
            Arc::new(FileRepo::open(config::ACCOUNT_ID_SNAPSHOT_PATH)),
            Arc::new(FileRepo::open(config::ACCOUNT_TOKEN_SNAPSHOT_PATH)),
        );
        let account_service = Arc::new(AccountService::new(account_repo));

        let upstream = UpstreamClient::new(spider_url);
        let student_service = Arc::new(StudentService::new(upstream));

        let worker_pool = Arc::new(WorkerPool::new(worker_pool_size));

        macro_rules! personal_cache {
            ($call:expr) => {
                InformationCache::personal(
                    personal_checker(),
                    update_task(
                        Arc::clone(&student_service),
                        Arc::clone(&account_service),
                        $call,
                    ),
                    Arc::clone(&worker_pool),
                )
            };
        }
        macro_rules! public_cache {
            ($call:expr) => {
                InformationCache::public(
                    daily_checker(),
                    update_task(
                        Arc::clone(&student_service),
                        Arc::clone(&account_service),
                        $call,
                    ),
                    Arc::clone(&worker_pool),
                )
            };
        }

        let courses = personal_cache!(|proxy: Arc<crate::upstream::StudentProxy>| async move {
            proxy.student_courses().await
        });
        let exams = personal_cache!(|proxy: Arc<crate::upstream::StudentProxy>| async move {
            proxy.student_exams().await
        });
        let info = personal_cache!(
            |proxy: Arc<crate::upstream::StudentProxy>| async move { proxy.info().await }
        );
        let major_scores = personal_cache!(|proxy: Arc<crate::upstream::StudentProxy>| async move {
            proxy.student_score(true).await
        });
        let minor_scores = personal_cache!(|proxy: Arc<crate::upstream::StudentProxy>| async move {
            proxy.student_score(false).await
        });
        let compulsory_rank =
            personal_cache!(|proxy: Arc<crate::upstream::StudentProxy>| async move {
                proxy.student_rank(true).await
            });
        let rank = personal_cache!(|proxy: Arc<crate::upstream::StudentProxy>| async move {
            proxy.student_rank(false).await
        });
        let teaching_calendar =
            public_cache!(|proxy: Arc<crate::upstream::StudentProxy>| async move {
                proxy.teaching_calendar().await
            });
        let classroom_today =
            public_cache!(|proxy: Arc<crate::upstream::StudentProxy>| async move {
                proxy.classroom_status(0).await
            });
        let classroom_tomorrow =
            public_cache!(|proxy: Arc<crate::upstream::StudentProxy>| async move {
                proxy.classroom_status(1).await
            });

        Arc::new(Self {
            account_service,
            student_service,
            worker_pool,
            courses,
            exams,
            info,
            major_scores,
            minor_scores,
            compulsory_rank,
            rank,
            teaching_calendar,
            classroom_today,
            classroom_tomorrow,
        })
    }
}
