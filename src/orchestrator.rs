//! Binds a cached key (student id) to account lookup, student proxy
//! construction, and the upstream call that actually refreshes a value.
//! An explicit builder function returning the [`crate::cache::Updater`]
//! the cache dispatches from its worker pool.

use std::future::Future;
use std::sync::Arc;

use crate::account::AccountService;
use crate::cache::Updater;
use crate::errors::AppError;
use crate::upstream::{StudentProxy, StudentService};

/// Wraps an upstream call `call` (e.g. "fetch this student's score board")
/// into an [`Updater`] that resolves or rebuilds the student's proxy first,
/// and locks the account if the call comes back `Unauthorized`.
pub fn update_task<V, F, Fut>(
    student_service: Arc<StudentService>,
    account_service: Arc<AccountService>,
    call: F,
) -> Updater<V>
where
    V: Send + 'static,
    F: Fn(Arc<StudentProxy>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, AppError>> + Send + 'static,
{
    let call = Arc::new(call);
    Arc::new(move |student_id: String| {
        let student_service = Arc::clone(&student_service);
        let account_service = Arc::clone(&account_service);
        let call = Arc::clone(&call);
        Box::pin(async move {
            let proxy = match student_service.get_student(&student_id) {
                Some(proxy) => Some(proxy),
                None => rebuild_proxy(&student_service, &account_service, &student_id).await,
            };

            let Some(proxy) = proxy else {
                return Err(AppError::NotFound);
            };

            let result = call(proxy).await;
            if matches!(result, Err(AppError::Unauthorized)) {
                tracing::info!(student_id = %student_id, "locking account after unauthorized upstream response");
                if let Err(err) = account_service.lock_account(&student_id) {
                    tracing::warn!(student_id = %student_id, error = %err, "failed to lock account");
                }
            }
            result
        })
    })
}

/// Best-effort: re-authenticate from stored credentials if the proxy was
/// never built (fresh process) or was dropped. Absence of the account, or
/// a failed re-login, both fall through to `None` — the caller remains
/// stale rather than erroring the request path.
async fn rebuild_proxy(
    student_service: &StudentService,
    account_service: &AccountService,
    student_id: &str,
) -> Option<Arc<StudentProxy>> {
    let account = account_service.get_by_account_id(student_id).ok()?;
    if let Err(err) = student_service
        .set_student(&account.id, &account.password)
        .await
    {
        tracing::warn!(student_id, error = %err, "failed to rebuild student proxy");
    }
    student_service.get_student(&account.id)
}
