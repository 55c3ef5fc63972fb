//! Database module for Incoherent
//!
//! Persists one session state per user.

mod schema;

pub use schema::*;

use crate::state_machine::SessionState;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Corrupt session state for {user_id}: {source}")]
    CorruptState {
        user_id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode session state: {0}")]
    Encode(#[source] serde_json::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn run_migrations(&self) -> DbResult<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== Session Operations ====================

    /// Fetch the raw row for a user
    pub fn get_session_row(&self, user_id: &str) -> DbResult<Option<SessionRow>> {
        let conn = self.conn();
        let row = conn
            .query_row(
                "SELECT user_id, state, created_at, updated_at FROM sessions WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(SessionRow {
                        user_id: row.get(0)?,
                        state: row.get(1)?,
                        created_at: parse_datetime(&row.get::<_, String>(2)?),
                        updated_at: parse_datetime(&row.get::<_, String>(3)?),
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Load the persisted state for a user
    pub fn load_session(&self, user_id: &str) -> DbResult<Option<SessionState>> {
        let Some(row) = self.get_session_row(user_id)? else {
            return Ok(None);
        };
        let state = serde_json::from_str(&row.state).map_err(|source| DbError::CorruptState {
            user_id: user_id.to_string(),
            source,
        })?;
        Ok(Some(state))
    }

    /// Insert or replace the persisted state for a user
    pub fn save_session(&self, user_id: &str, state: &SessionState) -> DbResult<()> {
        let state_json = serde_json::to_string(state).map_err(DbError::Encode)?;
        let now = Utc::now().to_rfc3339();

        self.conn().execute(
            "INSERT INTO sessions (user_id, state, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(user_id) DO UPDATE SET state = excluded.state, updated_at = excluded.updated_at",
            params![user_id, state_json, now],
        )?;
        Ok(())
    }

    /// Number of users with persisted state
    pub fn session_count(&self) -> DbResult<u64> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
