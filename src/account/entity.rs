use serde::{Deserialize, Serialize};

/// Lifecycle state of an account. A banned account keeps its mapping so a
/// stale bearer token is recognisably inactive rather than unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Normal,
    Banned,
}

/// A student's proxy-facing account: client credentials, the minted
/// bearer token, and lifecycle status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub password: String,
    pub token: String,
    pub status: AccountStatus,
}

impl Account {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.status, AccountStatus::Normal)
    }
}
