//! Per-student wrapper holding the upstream-issued dynamic token and
//! retrying getter loop.
//!
//! Relogin is lock-coalesced: snapshot the version counter, acquire the
//! lock, recheck the version, and only perform the real login if nobody
//! refreshed while we waited.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, RwLock};

use crate::errors::AppError;

use super::client::UpstreamClient;
use super::models::{ClassroomStatusTable, CourseList, ExamList, Rank, ScoreBoard, StudentInfo, TeachingCalendar};

const LOGIN_ATTEMPTS: u32 = 3;
const GETTER_ATTEMPTS: u32 = 3;

/// Per-student proxy over [`UpstreamClient`], eagerly authenticated at
/// construction and re-authenticated transparently on token expiry.
pub struct StudentProxy {
    username: String,
    password: String,
    client: UpstreamClient,
    token: RwLock<Option<String>>,
    version: AtomicU64,
    login_mutex: Mutex<()>,
}

impl StudentProxy {
    /// Admission gate: fails if the credentials are rejected by upstream.
    pub async fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        client: UpstreamClient,
    ) -> Result<Self, AppError> {
        let proxy = Self {
            username: username.into(),
            password: password.into(),
            client,
            token: RwLock::new(None),
            version: AtomicU64::new(0),
            login_mutex: Mutex::new(()),
        };
        proxy.refresh_login().await?;
        Ok(proxy)
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    async fn current_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Refresh the dynamic token, coalescing concurrent callers onto a
    /// single login attempt.
    async fn refresh_login(&self) -> Result<String, AppError> {
        let observed_version = self.version.load(Ordering::SeqCst);
        let _guard = self.login_mutex.lock().await;

        if self.version.load(Ordering::SeqCst) != observed_version {
            if let Some(token) = self.current_token().await {
                return Ok(token);
            }
        }

        let mut last_err = None;
        for _ in 0..LOGIN_ATTEMPTS {
            match self.client.login(&self.username, &self.password).await {
                Ok(response) => {
                    *self.token.write().await = Some(response.token.clone());
                    self.version.fetch_add(1, Ordering::SeqCst);
                    return Ok(response.token);
                }
                Err(AppError::Unauthorized) => {
                    self.version.fetch_add(1, Ordering::SeqCst);
                    return Err(AppError::Unauthorized);
                }
                Err(err) => last_err = Some(err),
            }
        }
        self.version.fetch_add(1, Ordering::SeqCst);
        Err(last_err.unwrap_or(AppError::ServiceUnavailable))
    }

    /// The generic getter loop shared by every data-fetch operation: up to
    /// [`GETTER_ATTEMPTS`] calls, relogging in on `Unauthorized` and
    /// retrying transparently on `ServiceUnavailable`.
    async fn do_getter<'a, F, Fut, V>(&'a self, call: F) -> Result<V, AppError>
    where
        F: Fn(&'a UpstreamClient, String) -> Fut,
        Fut: Future<Output = Result<V, AppError>>,
    {
        if self.current_token().await.is_none() {
            self.refresh_login().await?;
        }

        let mut last_err = None;
        for _ in 0..GETTER_ATTEMPTS {
            let token = self.current_token().await.unwrap_or_default();
            match call(&self.client, token).await {
                Ok(value) => return Ok(value),
                Err(AppError::Unauthorized) => {
                    last_err = Some(AppError::Unauthorized);
                    self.refresh_login().await?;
                }
                Err(AppError::ServiceUnavailable) => {
                    last_err = Some(AppError::ServiceUnavailable);
                }
                Err(err) => return Err(err),
            }
        }
        Err(AppError::Logical(format!(
            "exceeded retry attempts: {}",
            last_err.map_or_else(String::new, |e| e.to_string())
        )))
    }

    pub async fn teaching_calendar(&self) -> Result<TeachingCalendar, AppError> {
        self.do_getter(|client, token| async move { client.teaching_calendar(&token).await })
            .await
    }

    pub async fn classroom_status(&self, day: u8) -> Result<ClassroomStatusTable, AppError> {
        self.do_getter(move |client, token| async move { client.classroom_status(&token, day).await })
            .await
    }

    pub async fn student_courses(&self) -> Result<CourseList, AppError> {
        self.do_getter(|client, token| async move { client.student_courses(&token).await })
            .await
    }

    pub async fn student_exams(&self) -> Result<ExamList, AppError> {
        self.do_getter(|client, token| async move { client.student_exams(&token).await })
            .await
    }

    pub async fn info(&self) -> Result<StudentInfo, AppError> {
        self.do_getter(|client, token| async move { client.student_info(&token).await })
            .await
    }

    pub async fn student_score(&self, is_major: bool) -> Result<ScoreBoard, AppError> {
        self.do_getter(move |client, token| async move { client.student_score(&token, is_major).await })
            .await
    }

    pub async fn student_rank(&self, only_required: bool) -> Result<Rank, AppError> {
        self.do_getter(move |client, token| async move { client.student_rank(&token, only_required).await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::AtomicU32;
    use std::sync::Arc;

    struct Stub {
        reject_login: bool,
        unavailable_until: AtomicU32,
    }

    async fn login(State(stub): State<Arc<Stub>>) -> Result<Json<Value>, StatusCode> {
        if stub.reject_login {
            return Err(StatusCode::UNAUTHORIZED);
        }
        Ok(Json(
            json!({ "code": 1, "message": "success", "data": { "token": "tok" } }),
        ))
    }

    async fn calendar(State(stub): State<Arc<Stub>>) -> Result<Json<Value>, StatusCode> {
        if stub.unavailable_until.load(Ordering::SeqCst) > 0 {
            stub.unavailable_until.fetch_sub(1, Ordering::SeqCst);
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
        Ok(Json(json!({
            "code": 1,
            "message": "success",
            "data": { "start": "2025-01-01", "weeks": 20, "term_id": "t1" }
        })))
    }

    async fn spawn(stub: Arc<Stub>) -> String {
        let app = Router::new()
            .route("/login", post(login))
            .route("/calendar", get(calendar))
            .with_state(stub);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn construction_fails_on_rejected_login() {
        let stub = Arc::new(Stub {
            reject_login: true,
            unavailable_until: AtomicU32::new(0),
        });
        let base_url = spawn(stub).await;
        let client = UpstreamClient::new(base_url);

        let result = StudentProxy::new("alice", "bad-password", client).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn getter_exhausts_retry_budget_on_repeated_service_unavailable() {
        let stub = Arc::new(Stub {
            reject_login: false,
            unavailable_until: AtomicU32::new(3),
        });
        let base_url = spawn(stub).await;
        let client = UpstreamClient::new(base_url);
        let proxy = StudentProxy::new("alice", "p", client).await.unwrap();

        let err = proxy.teaching_calendar().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "exceeded retry attempts: service unavailable"
        );
    }
}
