//! HTTP surface: login, the ten cached data endpoints, account
//! introspection, and the iCalendar subscription/help endpoints.

use std::sync::Arc;

use axum::extract::{Extension, Form, FromRequest, Json, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::{self, LoginRequest};
use crate::auth_middleware::AuthenticatedStudent;
use crate::errors::ApiError;
use crate::icalendar::{build_course_calendar, build_exam_calendar};
use crate::state::AppState;

pub type ApiResult<T> = Result<T, ApiError>;

/// `{username, password}`, accepted as either a JSON or a form-urlencoded
/// body, via axum's manual-`FromRequest` pattern for content-negotiated
/// bodies.
pub struct LoginPayload(pub LoginRequest);

#[axum::async_trait]
impl<S> FromRequest<S> for LoginPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(request) = Form::<LoginRequest>::from_request(req, state)
                .await
                .map_err(|err| ApiError::BadRequest(format!("invalid form body: {err}")))?;
            Ok(Self(request))
        } else {
            let Json(request) = Json::<LoginRequest>::from_request(req, state)
                .await
                .map_err(|err| ApiError::BadRequest(format!("invalid JSON body: {err}")))?;
            Ok(Self(request))
        }
    }
}

/// Wraps a cache read in the response envelope used by every data
/// endpoint: `200` when the value is fresh, `203 Non-Authoritative
/// Information` when it is stale or a placeholder.
fn cached_response<V: Serialize>(data: V, fresh: bool) -> Response {
    let status = if fresh {
        StatusCode::OK
    } else {
        StatusCode::NON_AUTHORITATIVE_INFORMATION
    };
    (
        status,
        Json(json!({ "code": 1, "message": "success", "data": data })),
    )
        .into_response()
}

/// `POST /login`.
pub async fn login(
    State(state): State<Arc<AppState>>,
    LoginPayload(request): LoginPayload,
) -> ApiResult<Response> {
    let token = auth::login(&state.student_service, &state.account_service, request).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "code": 1, "message": "success", "data": { "token": token } })),
    )
        .into_response())
}

/// `POST /account` — RFC 7662-ish introspection, form `token=…`, no auth.
#[derive(Debug, Deserialize)]
pub struct IntrospectRequest {
    pub token: String,
}

pub async fn account(
    State(state): State<Arc<AppState>>,
    Form(request): Form<IntrospectRequest>,
) -> ApiResult<Response> {
    let result = auth::introspect(&state.account_service, &request.token);
    Ok(Json(result).into_response())
}

pub async fn courses(
    State(state): State<Arc<AppState>>,
    Extension(student): Extension<AuthenticatedStudent>,
) -> Response {
    let (data, fresh) = state.courses.get(&student.student_id);
    cached_response(data, fresh)
}

pub async fn exams(
    State(state): State<Arc<AppState>>,
    Extension(student): Extension<AuthenticatedStudent>,
) -> Response {
    let (data, fresh) = state.exams.get(&student.student_id);
    cached_response(data, fresh)
}

pub async fn info(
    State(state): State<Arc<AppState>>,
    Extension(student): Extension<AuthenticatedStudent>,
) -> Response {
    let (data, fresh) = state.info.get(&student.student_id);
    cached_response(data, fresh)
}

pub async fn scores(
    State(state): State<Arc<AppState>>,
    Extension(student): Extension<AuthenticatedStudent>,
) -> Response {
    let (data, fresh) = state.major_scores.get(&student.student_id);
    cached_response(data, fresh)
}

pub async fn minor_scores(
    State(state): State<Arc<AppState>>,
    Extension(student): Extension<AuthenticatedStudent>,
) -> Response {
    let (data, fresh) = state.minor_scores.get(&student.student_id);
    cached_response(data, fresh)
}

pub async fn compulsory_rank(
    State(state): State<Arc<AppState>>,
    Extension(student): Extension<AuthenticatedStudent>,
) -> Response {
    let (data, fresh) = state.compulsory_rank.get(&student.student_id);
    cached_response(data, fresh)
}

pub async fn rank(
    State(state): State<Arc<AppState>>,
    Extension(student): Extension<AuthenticatedStudent>,
) -> Response {
    let (data, fresh) = state.rank.get(&student.student_id);
    cached_response(data, fresh)
}

pub async fn calendar(
    State(state): State<Arc<AppState>>,
    Extension(student): Extension<AuthenticatedStudent>,
) -> Response {
    let (data, fresh) = state.teaching_calendar.get(&student.student_id);
    cached_response(data, fresh)
}

pub async fn classroom_today(
    State(state): State<Arc<AppState>>,
    Extension(student): Extension<AuthenticatedStudent>,
) -> Response {
    let (data, fresh) = state.classroom_today.get(&student.student_id);
    cached_response(data, fresh)
}

pub async fn classroom_tomorrow(
    State(state): State<Arc<AppState>>,
    Extension(student): Extension<AuthenticatedStudent>,
) -> Response {
    let (data, fresh) = state.classroom_tomorrow.get(&student.student_id);
    cached_response(data, fresh)
}

const ICALENDAR_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// `GET /icalendar/courses` — the authenticated student's course schedule
/// as a `VCALENDAR` of weekly-recurring `VEVENT`s.
pub async fn icalendar_courses(
    State(state): State<Arc<AppState>>,
    Extension(student): Extension<AuthenticatedStudent>,
) -> ApiResult<Response> {
    let (courses, _) = state.courses.get(&student.student_id);
    let (calendar, _) = state.teaching_calendar.get(&student.student_id);
    let ics = build_course_calendar(&courses, &calendar)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, ICALENDAR_CONTENT_TYPE)],
        ics.to_ics(),
    )
        .into_response())
}

/// `GET /icalendar/exams` — the authenticated student's exams as a
/// `VCALENDAR` of one-off `VEVENT`s.
pub async fn icalendar_exams(
    State(state): State<Arc<AppState>>,
    Extension(student): Extension<AuthenticatedStudent>,
) -> ApiResult<Response> {
    let (exams, _) = state.exams.get(&student.student_id);
    let ics = build_exam_calendar(&exams)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, ICALENDAR_CONTENT_TYPE)],
        ics.to_ics(),
    )
        .into_response())
}

const ICALENDAR_HELP_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>campus-spider-proxy iCalendar</title></head>
<body>
<h1>iCalendar subscriptions</h1>
<p>Add these URLs as a subscribed calendar (not a one-time import) so your
calendar app keeps them up to date:</p>
<ul>
<li><code>/icalendar/courses</code> &mdash; your course schedule</li>
<li><code>/icalendar/exams</code> &mdash; your exam schedule</li>
</ul>
<p>Both require your bearer token, either as <code>Authorization: Bearer
&lt;token&gt;</code> or a <code>token</code> header, since most calendar
clients cannot set custom headers on a subscribed URL &mdash; check your
client's documentation for how to attach one.</p>
</body>
</html>
"#;

/// `GET /icalendar` — static help page, no auth.
pub async fn icalendar_help() -> Html<&'static str> {
    Html(ICALENDAR_HELP_PAGE)
}
