// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::path::Path;

use advo_core::AdvoError;
use tracing::debug;

/// Handle to the single SQLite connection used by all query modules.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path` with WAL mode and
    /// runs all pending migrations before the handle is returned.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, AdvoError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| AdvoError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        // Migrations run on a short-lived blocking connection so the
        // refinery runner sees a plain `rusqlite::Connection`.
        let migrate_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), AdvoError> {
            let mut conn =
                rusqlite::Connection::open(&migrate_path).map_err(|e| AdvoError::Storage {
                    source: Box::new(e),
                })?;
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")
                    .map_err(|e| AdvoError::Storage {
                        source: Box::new(e),
                    })?;
            }
            crate::migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| AdvoError::Internal(format!("migration task panicked: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| map_tr_err(e.into()))?;

        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA foreign_keys = ON;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// Returns the shared connection for query modules.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoints the WAL so all committed data reaches the main file.
    pub async fn close(&self) -> Result<(), AdvoError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Maps a tokio-rusqlite error into the shared storage error variant.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> AdvoError {
    AdvoError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_database_file_and_schema() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("open_test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        assert!(db_path.exists());

        // Migration-created tables are queryable.
        let count: i64 = db
            .connection()
            .call(|conn| {
                let n = conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
                Ok::<_, rusqlite::Error>(n)
            })
            .await
            .unwrap();
        assert_eq!(count, 0);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_twice_is_idempotent_for_migrations() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reopen.db");
        let path = db_path.to_str().unwrap();

        let db1 = Database::open(path, true).await.unwrap();
        db1.close().await.unwrap();
        drop(db1);

        // Second open must not fail on already-applied migrations.
        let db2 = Database::open(path, true).await.unwrap();
        db2.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested/dirs/advo.db");
        let db = Database::open(db_path.to_str().unwrap(), false).await.unwrap();
        assert!(db_path.exists());
        db.close().await.unwrap();
    }
}
