//! Integration tests for the student proxy's retry/relogin loop against a
//! hand-rolled stub upstream server.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use campus_spider_proxy::errors::AppError;
use campus_spider_proxy::upstream::{StudentProxy, UpstreamClient};

/// Stub upstream that issues a fresh token on every `/login` call and
/// rejects stale ones, so the proxy's relogin path is actually exercised.
struct StubState {
    logins: AtomicU32,
    current_token: std::sync::Mutex<Option<String>>,
    unavailable_until: AtomicU32,
}

async fn stub_login(State(state): State<Arc<StubState>>) -> Json<Value> {
    let count = state.logins.fetch_add(1, Ordering::SeqCst) + 1;
    let token = format!("token-{count}");
    *state.current_token.lock().unwrap() = Some(token.clone());
    Json(json!({ "code": 1, "message": "success", "data": { "token": token } }))
}

fn check_token(state: &StubState, headers: &HeaderMap) -> Result<(), StatusCode> {
    let remaining = state.unavailable_until.load(Ordering::SeqCst);
    if remaining > 0 {
        state.unavailable_until.fetch_sub(1, Ordering::SeqCst);
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    let provided = headers.get("token").and_then(|v| v.to_str().ok());
    let current = state.current_token.lock().unwrap().clone();
    if provided.is_some() && provided == current.as_deref() {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn stub_courses(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    check_token(&state, &headers)?;
    Ok(Json(json!({
        "code": 1,
        "message": "success",
        "data": { "courses": [] }
    })))
}

async fn stub_info(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    check_token(&state, &headers)?;
    Ok(Json(json!({
        "code": 1,
        "message": "success",
        "data": { "student_id": "s1", "name": "Alice", "gender": "", "birthday": "",
                   "major": "", "class_": "", "entrance_day": "", "college": "" }
    })))
}

async fn stub_classroom(
    State(state): State<Arc<StubState>>,
    Path(_day): Path<u8>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    check_token(&state, &headers)?;
    Ok(Json(json!({
        "code": 1,
        "message": "success",
        "data": { "classrooms": {}, "date": "2025-01-01" }
    })))
}

async fn spawn_stub(state: Arc<StubState>) -> String {
    let app = Router::new()
        .route("/login", post(stub_login))
        .route("/courses", get(stub_courses))
        .route("/info", get(stub_info))
        .route("/classroom/:day", get(stub_classroom))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn login_succeeds_and_fetches_data() {
    let state = Arc::new(StubState {
        logins: AtomicU32::new(0),
        current_token: std::sync::Mutex::new(None),
        unavailable_until: AtomicU32::new(0),
    });
    let base_url = spawn_stub(Arc::clone(&state)).await;

    let client = UpstreamClient::new(base_url);
    let proxy = StudentProxy::new("alice", "p", client).await.unwrap();

    let courses = proxy.student_courses().await.unwrap();
    assert!(courses.courses.is_empty());
    assert_eq!(state.logins.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stale_token_triggers_relogin_transparently() {
    let state = Arc::new(StubState {
        logins: AtomicU32::new(0),
        current_token: std::sync::Mutex::new(None),
        unavailable_until: AtomicU32::new(0),
    });
    let base_url = spawn_stub(Arc::clone(&state)).await;

    let client = UpstreamClient::new(base_url);
    let proxy = StudentProxy::new("alice", "p", client).await.unwrap();
    assert_eq!(state.logins.load(Ordering::SeqCst), 1);

    // Simulate the upstream invalidating the token out from under the
    // proxy (e.g. another session logged in and rotated it upstream).
    *state.current_token.lock().unwrap() = Some("someone-elses-token".to_string());

    let info = proxy.info().await.unwrap();
    assert_eq!(info.name, "Alice");
    assert_eq!(state.logins.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn transient_service_unavailable_is_retried() {
    let state = Arc::new(StubState {
        logins: AtomicU32::new(0),
        current_token: std::sync::Mutex::new(None),
        unavailable_until: AtomicU32::new(2),
    });
    let base_url = spawn_stub(Arc::clone(&state)).await;

    let client = UpstreamClient::new(base_url);
    let proxy = StudentProxy::new("alice", "p", client).await.unwrap();

    let table = proxy.classroom_status(0).await.unwrap();
    assert_eq!(table.date, "2025-01-01");
}

#[tokio::test]
async fn three_consecutive_service_unavailable_exhausts_retry_budget() {
    let state = Arc::new(StubState {
        logins: AtomicU32::new(0),
        current_token: std::sync::Mutex::new(None),
        unavailable_until: AtomicU32::new(3),
    });
    let base_url = spawn_stub(Arc::clone(&state)).await;

    let client = UpstreamClient::new(base_url);
    let proxy = StudentProxy::new("alice", "p", client).await.unwrap();

    let err = proxy.classroom_status(0).await.unwrap_err();
    assert_eq!(err.to_string(), "exceeded retry attempts: service unavailable");
}

async fn spawn_login_rejecting_stub() -> String {
    async fn reject_login() -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    let app = Router::new().route("/login", post(reject_login));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn construction_fails_when_initial_login_is_rejected() {
    let base_url = spawn_login_rejecting_stub().await;
    let client = UpstreamClient::new(base_url);

    let result = StudentProxy::new("alice", "wrong-password", client).await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
}
