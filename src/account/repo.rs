//! Bidirectional id↔token account store.
//!
//! The id and token indices are kept consistent under concurrent writers
//! by mutating both while holding one `write_lock`, so `SaveOrUpdate`'s
//! three mutations land as a single atomic unit.

use std::sync::Arc;
use std::sync::Mutex;

use crate::errors::AppError;
use crate::kv::KvRepo;

use super::entity::Account;

type Store = Arc<dyn KvRepo<String, Account> + Send + Sync>;

pub struct AccountRepo {
    id_repo: Store,
    token_repo: Store,
    write_lock: Mutex<()>,
}

impl AccountRepo {
    #[must_use]
    pub fn new(id_repo: Store, token_repo: Store) -> Self {
        Self {
            id_repo,
            token_repo,
            write_lock: Mutex::new(()),
        }
    }

    pub fn get_by_account_id(&self, id: &str) -> Result<Account, AppError> {
        self.id_repo.get(&id.to_string()).ok_or(AppError::NotFound)
    }

    pub fn get_by_token(&self, token: &str) -> Result<Account, AppError> {
        self.token_repo
            .get(&token.to_string())
            .ok_or(AppError::NotFound)
    }

    /// Enforces token uniqueness and retires an account's previous token,
    /// all under one lock so the bidirection invariant holds even under
    /// concurrent writers for the same id.
    pub fn save_or_update(&self, account: Account) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().expect("account repo lock poisoned");

        if let Some(existing) = self.token_repo.get(&account.token) {
            if existing.id != account.id {
                return Err(AppError::TokenCollision);
            }
        }

        if let Some(previous) = self.id_repo.get(&account.id) {
            if previous.token != account.token {
                self.token_repo.delete(&previous.token);
            }
        }

        self.token_repo.set(account.token.clone(), account.clone());
        self.id_repo.set(account.id.clone(), account);
        Ok(())
    }
}
