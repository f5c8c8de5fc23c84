//! Binds student ids to live [`StudentProxy`] instances.

use std::sync::Arc;

use crate::errors::AppError;
use crate::kv::{KvRepo, MemRepo};

use super::client::UpstreamClient;
use super::student::StudentProxy;

pub struct StudentService {
    repo: MemRepo<String, Arc<StudentProxy>>,
    client: UpstreamClient,
}

impl StudentService {
    #[must_use]
    pub fn new(client: UpstreamClient) -> Self {
        Self {
            repo: MemRepo::new(),
            client,
        }
    }

    /// Looks up the live proxy for `username`. Absent if the student was
    /// never logged in or construction previously failed.
    pub fn get_student(&self, username: &str) -> Option<Arc<StudentProxy>> {
        self.repo.get(&username.to_string())
    }

    /// Authenticates a student against upstream and stores the resulting
    /// proxy. Fails (without storing anything) if credentials are rejected.
    pub async fn set_student(&self, username: &str, password: &str) -> Result<(), AppError> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::Logical("invalid username or password".to_string()));
        }

        let proxy = StudentProxy::new(username, password, self.client.clone()).await?;
        self.repo.set(username.to_string(), Arc::new(proxy));
        Ok(())
    }
}
