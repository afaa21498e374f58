//! SQLite Credential Store

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};

use crate::domain::{Authentication, CredentialStore, LoginName, Password, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    name TEXT PRIMARY KEY,
    password TEXT NOT NULL
);
";

/// Credential records in a `users` table, kept across restarts.
///
/// Passwords are compared in plaintext.
pub struct SqliteCredentialStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCredentialStore {
    /// Open (or create) the database file and its schema.
    ///
    /// Missing parent directories are created. Any failure is reported as
    /// `StoreError::Unavailable`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let conn = Connection::open(path).map_err(unavailable)?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(unavailable)?;
        conn.execute_batch(SCHEMA).map_err(unavailable)?;

        tracing::info!("Credential database opened at {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `query` on the blocking pool.
    async fn with_conn<T, F>(&self, query: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| StoreError::Unavailable("credential database lock poisoned".into()))?;
            query(&conn).map_err(unavailable)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("credential query aborted: {e}")))?
    }
}

fn unavailable(e: rusqlite::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| conn.query_row("SELECT 1", [], |_| Ok(())))
            .await
    }

    async fn register(&self, name: &LoginName, password: &Password) -> Result<(), StoreError> {
        let owned_name = name.as_str().to_string();
        let password = password.as_str().to_string();
        let inserted = self
            .with_conn(move |conn| {
                conn.execute(
                    "INSERT OR IGNORE INTO users (name, password) VALUES (?1, ?2)",
                    params![owned_name, password],
                )
            })
            .await?;

        if inserted == 0 {
            return Err(StoreError::DuplicateName(name.as_str().to_string()));
        }
        Ok(())
    }

    async fn authenticate(
        &self,
        name: &LoginName,
        password: &Password,
    ) -> Result<Authentication, StoreError> {
        let name = name.as_str().to_string();
        let stored = self
            .with_conn(move |conn| {
                conn.query_row(
                    "SELECT password FROM users WHERE name = ?1",
                    params![name],
                    |row| row.get::<_, String>(0),
                )
                .optional()
            })
            .await?;

        Ok(match stored {
            Some(stored) if stored == password.as_str() => Authentication::Accepted,
            Some(_) => Authentication::WrongPassword,
            None => Authentication::UnknownUser,
        })
    }
}
