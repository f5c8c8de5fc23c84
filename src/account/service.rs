//! Account lifecycle: token issuance, rotation, and locking.

use uuid::Uuid;

use crate::errors::AppError;

use super::entity::{Account, AccountStatus};
use super::repo::AccountRepo;

/// `Login` retries on token collision up to this bound, to avoid a
/// pathological spin under adversarial input (collision is astronomically
/// unlikely in practice).
const MAX_TOKEN_COLLISION_RETRIES: u32 = 8;

pub struct AccountService {
    repo: AccountRepo,
}

impl AccountService {
    #[must_use]
    pub fn new(repo: AccountRepo) -> Self {
        Self { repo }
    }

    pub fn get_by_account_id(&self, id: &str) -> Result<Account, AppError> {
        self.repo.get_by_account_id(id)
    }

    pub fn get_by_token(&self, token: &str) -> Result<Account, AppError> {
        self.repo.get_by_token(token)
    }

    /// Mints a fresh bearer token for `(username, password)` and retires
    /// any token the account previously held. Does not itself contact
    /// upstream — credential validation happens at the HTTP layer by
    /// authenticating the student proxy first (see [`crate::handlers::login`]).
    pub fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        for _ in 0..MAX_TOKEN_COLLISION_RETRIES {
            let token = Uuid::new_v4().to_string();
            let account = Account {
                id: username.to_string(),
                password: password.to_string(),
                token: token.clone(),
                status: AccountStatus::Normal,
            };
            match self.repo.save_or_update(account) {
                Ok(()) => return Ok(token),
                Err(AppError::TokenCollision) => continue,
                Err(other) => return Err(other),
            }
        }
        Err(AppError::TokenCollision)
    }

    pub fn lock_account(&self, id: &str) -> Result<(), AppError> {
        let mut account = self.repo.get_by_account_id(id)?;
        account.status = AccountStatus::Banned;
        self.repo.save_or_update(account)
    }
}
