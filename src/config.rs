//! Environment configuration

use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8000;

/// Settings read once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillConfig {
    /// `SQLite` file holding persisted sessions
    pub db_path: PathBuf,
    pub port: u16,
    /// Answer file override; the bundled table is used when unset
    pub pairings_path: Option<PathBuf>,
}

impl SkillConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = lookup("INCOHERENT_DB_PATH").map_or_else(
            || {
                let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(home).join(".incoherent").join("sessions.db")
            },
            PathBuf::from,
        );

        let port = lookup("INCOHERENT_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let pairings_path = lookup("INCOHERENT_PAIRINGS_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Self {
            db_path,
            port,
            pairings_path,
        }
    }
}
