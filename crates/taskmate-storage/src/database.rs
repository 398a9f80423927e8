// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All access is serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional connections for writes.

use std::time::Duration;

use taskmate_config::model::StorageConfig;
use taskmate_core::TaskmateError;
use tracing::{debug, info};

use crate::migrations::run_migrations;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database, apply PRAGMAs and migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, TaskmateError> {
        let path = config.database_path.clone();
        let wal_mode = config.wal_mode;

        let setup_path = path.clone();
        tokio::task::spawn_blocking(move || prepare(&setup_path, wal_mode))
            .await
            .map_err(|e| TaskmateError::Internal(format!("database setup task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(&path)
            .await
            .map_err(|e| TaskmateError::Storage {
                source: Box::new(e),
            })?;

        conn.call(|conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        info!(path = %path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Close the connection, flushing the background thread.
    pub async fn close(self) -> Result<(), TaskmateError> {
        self.conn.close().await.map_err(|e| TaskmateError::Storage {
            source: Box::new(e),
        })?;
        debug!("database closed");
        Ok(())
    }
}

/// Synchronous one-time setup: journal mode and schema.
fn prepare(path: &str, wal_mode: bool) -> Result<(), TaskmateError> {
    let storage_err = |e: rusqlite::Error| TaskmateError::Storage {
        source: Box::new(e),
    };

    let mut conn = rusqlite::Connection::open(path).map_err(storage_err)?;
    if wal_mode {
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(storage_err)?;
        debug!(journal_mode = %mode, "journal mode set");
    }
    conn.pragma_update(None, "synchronous", "NORMAL")
        .map_err(storage_err)?;
    run_migrations(&mut conn)
}

pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> TaskmateError {
    TaskmateError::Storage {
        source: Box::new(e),
    }
}
