//! Session state types

use crate::answers::AnswerTable;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invariant violations in a session state
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Playing without an answer table")]
    MissingAnswerTable,
    #[error("Playing without a current gibberish")]
    MissingGibberish,
    #[error("Current gibberish is not in the answer table: {0}")]
    UnknownGibberish(String),
    #[error("Draw pool entry is not in the answer table: {0}")]
    UnknownPoolEntry(String),
    #[error("Round data present while not playing")]
    StaleRound,
    #[error("Games played counter is at its maximum")]
    GamesPlayedOverflow,
}

/// Everything the skill remembers about a user.
///
/// Serialized with exactly these field names; the same record is kept in
/// memory for a live session and written to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub games_played: u64,
    pub is_playing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_table: Option<AnswerTable>,
    #[serde(default)]
    pub draw_pool: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_gibberish: Option<String>,
}

/// Macro-state of a session, borrowed from a validated [`SessionState`]
#[derive(Debug, Clone, Copy)]
pub enum Phase<'a> {
    Idle,
    InRound {
        table: &'a AnswerTable,
        gibberish: &'a str,
    },
}

impl SessionState {
    /// State for a user who has never played
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a round with a freshly drawn phrase
    pub fn playing(
        games_played: u64,
        table: AnswerTable,
        gibberish: String,
        draw_pool: Vec<String>,
    ) -> Self {
        Self {
            games_played,
            is_playing: true,
            answer_table: Some(table),
            draw_pool,
            current_gibberish: Some(gibberish),
        }
    }

    /// Drop any round data and stop playing
    pub fn idle(games_played: u64) -> Self {
        Self {
            games_played,
            ..Self::default()
        }
    }

    /// Current macro-state, failing when the round data is inconsistent
    pub fn phase(&self) -> Result<Phase<'_>, StateError> {
        if !self.is_playing {
            return Ok(Phase::Idle);
        }
        let table = self
            .answer_table
            .as_ref()
            .ok_or(StateError::MissingAnswerTable)?;
        let gibberish = self
            .current_gibberish
            .as_deref()
            .ok_or(StateError::MissingGibberish)?;
        if !table.contains(gibberish) {
            return Err(StateError::UnknownGibberish(gibberish.to_string()));
        }
        Ok(Phase::InRound { table, gibberish })
    }

    /// Check every invariant; used on state coming back from the store
    pub fn validate(&self) -> Result<(), StateError> {
        match self.phase()? {
            Phase::Idle => {
                if self.answer_table.is_some()
                    || self.current_gibberish.is_some()
                    || !self.draw_pool.is_empty()
                {
                    return Err(StateError::StaleRound);
                }
            }
            Phase::InRound { table, .. } => {
                if let Some(entry) = self.draw_pool.iter().find(|p| !table.contains(p)) {
                    return Err(StateError::UnknownPoolEntry(entry.clone()));
                }
            }
        }
        Ok(())
    }
}
