use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::domain::UserAccount;
use crate::error::Result;
use crate::table::DataTable;

/// Read-only access to the projections CSV. Every call goes back to the source.
pub trait DataSource: Send + Sync {
    fn load_table(&self) -> Result<DataTable>;

    /// The unmodified source bytes, for download.
    fn raw_bytes(&self) -> Result<Vec<u8>>;

    fn last_modified(&self) -> Result<DateTime<Local>>;

    fn describe(&self) -> String;
}

/// Persistent account storage keyed by unique, case-sensitive username.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>>;

    /// Insert a new account. Fails with `DuplicateUsername` when the name is taken,
    /// including when a concurrent insert wins the race.
    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<UserAccount>;

    async fn count_users(&self) -> Result<usize>;
}
