use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::app::ports::UserStore;
use crate::domain::UserAccount;
use crate::error::{Result, SiteError};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        username      TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    );
"#;

/// SQLite-backed accounts. The UNIQUE constraint on `username` is the final
/// arbiter when two signups race.
pub struct SqliteUserStore {
    conn: Mutex<Connection>,
}

impl SqliteUserStore {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        info!("Opened user store at {}", db_path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| SiteError::Storage("user store lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>> {
        let conn = self.conn()?;
        let account = conn
            .query_row(
                "SELECT id, username, password_hash FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok(UserAccount {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(account)
    }

    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<UserAccount> {
        let conn = self.conn()?;
        match conn.execute(
            "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
            params![username, password_hash],
        ) {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                return Err(SiteError::DuplicateUsername(username.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        let id = conn.last_insert_rowid();
        debug!("Created user {} with id {}", username, id);
        Ok(UserAccount {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        })
    }

    async fn count_users(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_then_find() {
        let store = SqliteUserStore::open_in_memory().unwrap();
        let created = store.insert_user("coach", "sha256$00$11").await.unwrap();

        let found = store.find_by_username("coach").await.unwrap().unwrap();
        assert_eq!(found, created);
        assert!(store.find_by_username("Coach").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unique_constraint_surfaces_as_duplicate() {
        let store = SqliteUserStore::open_in_memory().unwrap();
        store.insert_user("coach", "first").await.unwrap();

        let err = store.insert_user("coach", "second").await.unwrap_err();
        assert!(matches!(err, SiteError::DuplicateUsername(name) if name == "coach"));
        assert_eq!(store.count_users().await.unwrap(), 1);
        let kept = store.find_by_username("coach").await.unwrap().unwrap();
        assert_eq!(kept.password_hash, "first");
    }

    #[tokio::test]
    async fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instance").join("users.db");
        {
            let store = SqliteUserStore::open(&path).unwrap();
            store.insert_user("coach", "hash").await.unwrap();
        }
        let store = SqliteUserStore::open(&path).unwrap();
        assert_eq!(store.count_users().await.unwrap(), 1);
    }
}
