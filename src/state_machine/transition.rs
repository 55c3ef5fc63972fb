//! Pure state transition function
//!
//! Dispatch is a single `match` over (phase, event). The only input besides
//! the state and the event is the random source used to shuffle the table.

use super::state::{Phase, StateError};
use super::{Effect, Event, Reply, SessionState};
use crate::answers::{draw_next, draw_pool_init, normalize, AnswerTable, DataError};
use rand::Rng;
use thiserror::Error;

const REPEAT: &str = "repeat";
const SKIP: &str = "skip";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
    pub reply: Option<Reply>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
            reply: None,
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_reply(mut self, reply: Reply) -> Self {
        self.reply = Some(reply);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same state, event and random sequence it always produces the
/// same result, with no I/O.
pub fn transition<R: Rng + ?Sized>(
    state: &SessionState,
    rng: &mut R,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    let unchanged = || TransitionResult::new(state.clone());

    match (state.phase()?, event) {
        // Persisted state was reloaded by the runtime before we got here
        (_, Event::Launch) => Ok(unchanged().with_reply(Reply::welcome(state.games_played))),

        // ============================================================
        // Starting a game
        // ============================================================
        (Phase::Idle, Event::Yes) => Ok(unchanged().with_effect(Effect::LoadAnswers)),

        (Phase::Idle, Event::AnswersLoaded { table }) => start_round(state, table, rng),

        (Phase::InRound { .. }, Event::AnswersLoaded { .. }) => Err(
            TransitionError::InvalidTransition("answers loaded during a round".to_string()),
        ),

        (Phase::Idle, Event::No) => Ok(TransitionResult::new(SessionState::idle(state.games_played))
            .with_effect(Effect::PersistState)
            .with_effect(Effect::EndSession)
            .with_reply(Reply::goodbye())),

        // ============================================================
        // Guessing
        // ============================================================
        (Phase::InRound { table, gibberish }, Event::Guess { text }) => {
            let guess = normalize(&text);
            if guess == REPEAT {
                Ok(unchanged().with_reply(Reply::repeat(gibberish)))
            } else if guess == SKIP {
                let next = next_phrase(state, table, rng)?;
                let reply = Reply::skipped(current(&next));
                Ok(TransitionResult::new(next).with_reply(reply))
            } else if table.accepts(gibberish, &guess) {
                let next = next_phrase(state, table, rng)?;
                let reply = Reply::correct(&guess, current(&next));
                Ok(TransitionResult::new(next).with_reply(reply))
            } else {
                Ok(unchanged().with_reply(Reply::wrong(gibberish)))
            }
        }

        // ============================================================
        // Session control
        // ============================================================
        (_, Event::Help) => Ok(unchanged().with_reply(Reply::help())),

        (_, Event::Stop) => {
            let games_played = state
                .games_played
                .checked_add(1)
                .ok_or(StateError::GamesPlayedOverflow)?;
            Ok(TransitionResult::new(SessionState::idle(games_played))
                .with_effect(Effect::PersistState)
                .with_effect(Effect::EndSession)
                .with_reply(Reply::thanks()))
        }

        (_, Event::SessionEnded { .. }) => Ok(unchanged().with_effect(Effect::EndSession)),

        // Yes/No mid-round and guesses outside a round are not game moves
        (Phase::InRound { .. }, Event::Yes | Event::No)
        | (Phase::Idle, Event::Guess { .. })
        | (_, Event::Fallback) => Ok(unchanged().with_reply(Reply::fallback(state.is_playing))),

        (_, Event::Unrecognized) => Ok(unchanged().with_reply(Reply::unrecognized())),
    }
}

fn start_round<R: Rng + ?Sized>(
    state: &SessionState,
    table: AnswerTable,
    rng: &mut R,
) -> Result<TransitionResult, TransitionError> {
    let pool = draw_pool_init(&table, rng);
    let (gibberish, pool) = draw_next(pool, &table, rng)?;
    let reply = Reply::first_gibberish(&gibberish);
    Ok(
        TransitionResult::new(SessionState::playing(state.games_played, table, gibberish, pool))
            .with_reply(reply),
    )
}

fn next_phrase<R: Rng + ?Sized>(
    state: &SessionState,
    table: &AnswerTable,
    rng: &mut R,
) -> Result<SessionState, TransitionError> {
    let (gibberish, pool) = draw_next(state.draw_pool.clone(), table, rng)?;
    Ok(SessionState::playing(
        state.games_played,
        table.clone(),
        gibberish,
        pool,
    ))
}

fn current(state: &SessionState) -> &str {
    state.current_gibberish.as_deref().unwrap_or_default()
}
