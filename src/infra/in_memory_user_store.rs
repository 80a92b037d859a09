use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

use crate::app::ports::UserStore;
use crate::domain::UserAccount;
use crate::error::{Result, SiteError};

/// In-memory account store for development/testing
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<String, UserAccount>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>> {
        let users = self
            .users
            .lock()
            .map_err(|_| SiteError::Storage("user map lock poisoned".to_string()))?;
        Ok(users.get(username).cloned())
    }

    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<UserAccount> {
        let mut users = self
            .users
            .lock()
            .map_err(|_| SiteError::Storage("user map lock poisoned".to_string()))?;
        if users.contains_key(username) {
            return Err(SiteError::DuplicateUsername(username.to_string()));
        }

        let account = UserAccount {
            id: users.len() as i64 + 1,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.insert(username.to_string(), account.clone());
        debug!("Created user {} with id {}", username, account.id);
        Ok(account)
    }

    async fn count_users(&self) -> Result<usize> {
        let users = self
            .users
            .lock()
            .map_err(|_| SiteError::Storage("user map lock poisoned".to_string()))?;
        Ok(users.len())
    }
}
