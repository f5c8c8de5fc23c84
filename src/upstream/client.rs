//! HTTP client for the spider upstream.
//!
//! Status codes are classified into the taxonomy in
//! [`crate::errors::AppError`] rather than matched against error strings.

use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::AppError;

use super::models::{
    ClassroomStatusTable, CourseList, ExamList, LoginResponse, Rank, ScoreBoard, StudentInfo,
    TeachingCalendar, UpstreamEnvelope,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Thin JSON-over-HTTP client over the spider's fixed set of endpoints.
#[derive(Clone)]
pub struct UpstreamClient {
    base_url: String,
    http: reqwest::Client,
}

impl UpstreamClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("reqwest client configuration is valid");
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    fn url(&self, path_suffix: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path_suffix.trim_start_matches('/')
        )
    }

    async fn send(
        &self,
        method: reqwest::Method,
        path_suffix: &str,
        token: Option<&str>,
        body: Option<&impl Serialize>,
    ) -> Result<Response, AppError> {
        let mut builder = self.http.request(method, self.url(path_suffix));
        if let Some(token) = token {
            builder = builder.header("token", token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        match response.status() {
            StatusCode::OK => Ok(response),
            StatusCode::UNAUTHORIZED => Err(AppError::Unauthorized),
            StatusCode::SERVICE_UNAVAILABLE => Err(AppError::ServiceUnavailable),
            other => Err(AppError::Unknown(other.as_u16())),
        }
    }

    async fn decode_envelope<V: DeserializeOwned>(
        response: Response,
    ) -> Result<UpstreamEnvelope<V>, AppError> {
        let envelope: UpstreamEnvelope<V> = response.json().await?;
        Ok(envelope)
    }

    async fn get_with_token<V: DeserializeOwned>(
        &self,
        path_suffix: &str,
        token: &str,
    ) -> Result<V, AppError> {
        let response = self
            .send(
                reqwest::Method::GET,
                path_suffix,
                Some(token),
                None::<&()>,
            )
            .await?;
        let envelope = Self::decode_envelope::<V>(response).await?;
        if envelope.code != UpstreamEnvelope::<V>::SUCCESS_CODE {
            return Err(AppError::Logical(envelope.message));
        }
        Ok(envelope.data)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AppError> {
        #[derive(Serialize)]
        struct LoginBody<'a> {
            username: &'a str,
            password: &'a str,
        }
        let body = LoginBody { username, password };
        let response = self
            .send(reqwest::Method::POST, "/login", None, Some(&body))
            .await?;
        let envelope = Self::decode_envelope::<LoginResponse>(response).await?;
        if envelope.code != UpstreamEnvelope::<LoginResponse>::SUCCESS_CODE {
            return Err(AppError::Logical(envelope.message));
        }
        Ok(envelope.data)
    }

    pub async fn teaching_calendar(&self, token: &str) -> Result<TeachingCalendar, AppError> {
        self.get_with_token("/calendar", token).await
    }

    /// `day`: 0 for today, 1 for tomorrow.
    pub async fn classroom_status(
        &self,
        token: &str,
        day: u8,
    ) -> Result<ClassroomStatusTable, AppError> {
        self.get_with_token(&format!("/classroom/{day}"), token)
            .await
    }

    pub async fn student_courses(&self, token: &str) -> Result<CourseList, AppError> {
        self.get_with_token("/courses", token).await
    }

    pub async fn student_exams(&self, token: &str) -> Result<ExamList, AppError> {
        self.get_with_token("/exams", token).await
    }

    pub async fn student_info(&self, token: &str) -> Result<StudentInfo, AppError> {
        self.get_with_token("/info", token).await
    }

    pub async fn student_score(&self, token: &str, is_major: bool) -> Result<ScoreBoard, AppError> {
        let path = if is_major { "/scores" } else { "/minor/scores" };
        self.get_with_token(path, token).await
    }

    pub async fn student_rank(
        &self,
        token: &str,
        only_required: bool,
    ) -> Result<Rank, AppError> {
        let path = if only_required {
            "/compulsory/rank"
        } else {
            "/rank"
        };
        self.get_with_token(path, token).await
    }
}
