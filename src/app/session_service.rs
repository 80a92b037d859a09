use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::ports::UserStore;
use crate::domain::{Identity, UserAccount};
use crate::error::{Result, SiteError};
use crate::infra::password::{hash_password, verify_password};

/// Opaque value stored in the session cookie.
pub type SessionToken = String;

/// Signs users up, verifies credentials and tracks live sessions.
/// Accounts live in the injected `UserStore`; sessions live here.
pub struct SessionService {
    users: Arc<dyn UserStore>,
    sessions: RwLock<HashMap<SessionToken, Identity>>,
}

impl SessionService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create an account. The store is left unchanged when the username is taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<UserAccount> {
        let username = username.trim();
        if username.is_empty() {
            return Err(SiteError::Validation("Username is required".to_string()));
        }
        if password.is_empty() {
            return Err(SiteError::Validation("Password is required".to_string()));
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(SiteError::DuplicateUsername(username.to_string()));
        }

        let account = self
            .users
            .insert_user(username, &hash_password(password))
            .await?;
        info!("Registered user {}", account.username);
        Ok(account)
    }

    /// Verify credentials and open a session. Unknown user and wrong password
    /// fail the same way.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionToken> {
        let account = self.users.find_by_username(username.trim()).await?;
        let identity = match account {
            Some(account) if verify_password(password, &account.password_hash) => {
                Identity::from(&account)
            }
            _ => {
                warn!("Failed login attempt");
                return Err(SiteError::InvalidCredentials);
            }
        };

        let token = Uuid::new_v4().to_string();
        info!("User {} logged in", identity.username);
        self.sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(token.clone(), identity);
        Ok(token)
    }

    pub fn identity(&self, token: &str) -> Option<Identity> {
        self.sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(token)
            .cloned()
    }

    pub fn is_authenticated(&self, token: Option<&str>) -> bool {
        token.map_or(false, |t| self.identity(t).is_some())
    }

    pub fn logout(&self, token: &str) {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(token);
        if let Some(identity) = removed {
            info!("User {} logged out", identity.username);
        }
    }
}
