//! Events that can occur in a session

use crate::answers::AnswerTable;

/// Normalized events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    Launch,
    Yes,
    No,
    Guess { text: String },
    Help,
    /// Cancel and Stop are the same to the game
    Stop,
    Fallback,
    /// Anything the dispatcher could not map onto the game
    Unrecognized,

    // Platform events
    SessionEnded { reason: Option<String> },

    // Runtime events
    AnswersLoaded { table: AnswerTable },
}

impl Event {
    pub fn guess(text: impl Into<String>) -> Self {
        Event::Guess { text: text.into() }
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Launch => "launch",
            Event::Yes => "yes",
            Event::No => "no",
            Event::Guess { .. } => "guess",
            Event::Help => "help",
            Event::Stop => "stop",
            Event::Fallback => "fallback",
            Event::Unrecognized => "unrecognized",
            Event::SessionEnded { .. } => "session_ended",
            Event::AnswersLoaded { .. } => "answers_loaded",
        }
    }
}
