//! Database schema and types

use chrono::{DateTime, Utc};

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS sessions (
    user_id TEXT PRIMARY KEY,
    state TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_updated ON sessions(updated_at DESC);
";

/// A persisted row, state still encoded
#[allow(dead_code)] // Timestamps are read by tests and kept for operators
#[derive(Debug, Clone)]
pub struct SessionRow {
    pub user_id: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
