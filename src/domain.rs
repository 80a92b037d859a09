use serde::Serialize;

/// A stored account. Only the salted hash is kept, never the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

/// Who a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

impl From<&UserAccount> for Identity {
    fn from(account: &UserAccount) -> Self {
        Self {
            user_id: account.id,
            username: account.username.clone(),
        }
    }
}
