//! Skill runtime executor

use super::traits::{SessionStore, StoreError};
use crate::answers::{AnswerSource, DataError};
use crate::state_machine::{
    transition, Effect, Event, Reply, SessionState, StateError, TransitionError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use tokio::sync::RwLock;

/// Anything that can go wrong while handling a turn
#[derive(Debug, Error)]
pub enum SkillError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// One normalized request from the dispatcher
#[derive(Debug, Clone)]
pub struct Turn {
    pub user_id: String,
    pub session_id: String,
    /// The platform marks the first request of a session
    pub new_session: bool,
    pub event: Event,
}

/// Runs the session state machine against injected storage and content
pub struct SkillRuntime<S, A>
where
    S: SessionStore,
    A: AnswerSource,
{
    store: S,
    answers: A,
    /// Live sessions by session id
    sessions: RwLock<HashMap<String, SessionState>>,
    rng: Mutex<StdRng>,
}

impl<S, A> SkillRuntime<S, A>
where
    S: SessionStore,
    A: AnswerSource,
{
    pub fn new(store: S, answers: A) -> Self {
        Self::with_rng(store, answers, StdRng::from_entropy())
    }

    /// Runtime with a fixed random source (deterministic draws)
    pub fn with_rng(store: S, answers: A, rng: StdRng) -> Self {
        Self {
            store,
            answers,
            sessions: RwLock::new(HashMap::new()),
            rng: Mutex::new(rng),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// In-memory state of a live session
    #[allow(dead_code)] // Used in tests
    pub async fn session(&self, session_id: &str) -> Option<SessionState> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Handle one turn. Never fails: errors are logged and answered with an
    /// apology, leaving the session as it was.
    pub async fn handle(&self, turn: Turn) -> Option<Reply> {
        let user_id = turn.user_id.clone();
        let session_id = turn.session_id.clone();
        let kind = turn.event.kind();

        match self.process(turn).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(
                    user_id = %user_id,
                    session_id = %session_id,
                    event = kind,
                    error = %e,
                    "Failed to handle turn"
                );
                Some(Reply::apology())
            }
        }
    }

    async fn process(&self, turn: Turn) -> Result<Option<Reply>, SkillError> {
        let Turn {
            user_id,
            session_id,
            new_session,
            event,
        } = turn;

        // Session end gets no speech and never touches the store
        if let Event::SessionEnded { reason } = &event {
            tracing::info!(
                session_id = %session_id,
                reason = reason.as_deref().unwrap_or("unknown"),
                "Session ended"
            );
            self.sessions.write().await.remove(&session_id);
            return Ok(None);
        }

        let reload = new_session || matches!(event, Event::Launch);
        let mut state = self.resolve_state(&user_id, &session_id, reload).await?;
        let mut reply = None;
        let mut end_session = false;

        // Effects may feed follow-up events back in
        let mut events_to_process = vec![event];
        while let Some(current_event) = events_to_process.pop() {
            tracing::debug!(session_id = %session_id, event = current_event.kind(), "Processing event");

            let result = {
                let mut rng = self.rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                transition(&state, &mut *rng, current_event)?
            };

            for effect in result.effects {
                match effect {
                    Effect::LoadAnswers => {
                        let table = self.answers.load().await?;
                        tracing::info!(user_id = %user_id, phrases = table.len(), "Answer table loaded");
                        events_to_process.push(Event::AnswersLoaded { table });
                    }
                    Effect::PersistState => {
                        self.store.save(&user_id, &result.new_state).await?;
                        tracing::info!(
                            user_id = %user_id,
                            games_played = result.new_state.games_played,
                            "Session state persisted"
                        );
                    }
                    Effect::EndSession => end_session = true,
                }
            }

            state = result.new_state;
            if result.reply.is_some() {
                reply = result.reply;
            }
        }

        // Commit only after every effect succeeded
        let mut sessions = self.sessions.write().await;
        if end_session {
            sessions.remove(&session_id);
        } else {
            sessions.insert(session_id, state);
        }

        Ok(reply)
    }

    /// State for this turn: the live session, or whatever the store holds for
    /// the user at session start, or a fresh state for a first-time user.
    async fn resolve_state(
        &self,
        user_id: &str,
        session_id: &str,
        reload: bool,
    ) -> Result<SessionState, SkillError> {
        if !reload {
            if let Some(state) = self.sessions.read().await.get(session_id) {
                return Ok(state.clone());
            }
        }

        let state = match self.store.load(user_id).await? {
            Some(state) => {
                state.validate()?;
                state
            }
            None => {
                tracing::info!(user_id = %user_id, "First visit, starting fresh state");
                SessionState::new()
            }
        };
        Ok(state)
    }
}
