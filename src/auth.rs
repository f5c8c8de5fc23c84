//! Client-facing login and token introspection: login validates
//! credentials against upstream (by constructing a
//! [`crate::upstream::StudentProxy`] through [`StudentService::set_student`])
//! before minting the proxy's own bearer token through [`AccountService`].

use serde::{Deserialize, Serialize};

use crate::account::AccountService;
use crate::errors::AppError;
use crate::upstream::StudentService;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Authenticates `request` against upstream and mints a bearer token.
///
/// Upstream admission (via [`StudentService::set_student`]) runs first: it
/// both validates the credentials and installs the long-lived
/// [`crate::upstream::StudentProxy`] that later cache refreshes reuse. Only
/// once that succeeds is a local token minted.
pub async fn login(
    student_service: &StudentService,
    account_service: &AccountService,
    request: LoginRequest,
) -> Result<String, AppError> {
    student_service
        .set_student(&request.username, &request.password)
        .await?;
    account_service.login(&request.username, &request.password)
}

#[derive(Debug, Clone, Serialize)]
pub struct Introspection {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// RFC 7662-style introspection for the bearer tokens this proxy issues.
#[must_use]
pub fn introspect(account_service: &AccountService, token: &str) -> Introspection {
    match account_service.get_by_token(token) {
        Ok(account) if account.is_active() => Introspection {
            active: true,
            username: Some(account.id),
        },
        _ => Introspection {
            active: false,
            username: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountRepo;
    use crate::kv::MemRepo;
    use std::sync::Arc;

    fn new_account_service() -> AccountService {
        AccountService::new(AccountRepo::new(Arc::new(MemRepo::new()), Arc::new(MemRepo::new())))
    }

    #[test]
    fn introspect_reports_inactive_for_unknown_token() {
        let account_service = new_account_service();
        let result = introspect(&account_service, "no-such-token");
        assert!(!result.active);
        assert!(result.username.is_none());
    }

    #[test]
    fn introspect_reports_active_for_live_token() {
        let account_service = new_account_service();
        let token = account_service.login("alice", "p").unwrap();
        let result = introspect(&account_service, &token);
        assert!(result.active);
        assert_eq!(result.username.as_deref(), Some("alice"));
    }

    #[test]
    fn introspect_reports_inactive_once_locked() {
        let account_service = new_account_service();
        let token = account_service.login("alice", "p").unwrap();
        account_service.lock_account("alice").unwrap();
        let result = introspect(&account_service, &token);
        assert!(!result.active);
    }
}
