//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::*;
use crate::answers::{AnswerSource, AnswerTable, DataError};
use crate::state_machine::SessionState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

// ============================================================================
// In-Memory Store
// ============================================================================

/// Store backed by a `HashMap`, with switchable failures
#[derive(Default)]
pub struct InMemoryStore {
    states: Mutex<HashMap<String, SessionState>>,
    fail_saves: AtomicBool,
    fail_loads: AtomicBool,
    /// Number of successful saves
    pub saves: AtomicUsize,
}

#[allow(dead_code)]
impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed persisted state for a user
    pub fn with_state(self, user_id: &str, state: SessionState) -> Self {
        self.states.lock().unwrap().insert(user_id.to_string(), state);
        self
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn persisted(&self, user_id: &str) -> Option<SessionState> {
        self.states.lock().unwrap().get(user_id).cloned()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn load(&self, user_id: &str) -> Result<Option<SessionState>, StoreError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError("load failed".to_string()));
        }
        Ok(self.states.lock().unwrap().get(user_id).cloned())
    }

    async fn save(&self, user_id: &str, state: &SessionState) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError("save failed".to_string()));
        }
        self.states
            .lock()
            .unwrap()
            .insert(user_id.to_string(), state.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Mock Answer Source
// ============================================================================

/// Answer source serving a fixed JSON document
pub struct MockAnswers {
    json: Mutex<String>,
    /// Number of loads performed
    pub loads: AtomicUsize,
}

#[allow(dead_code)]
impl MockAnswers {
    pub fn new(json: impl Into<String>) -> Self {
        Self {
            json: Mutex::new(json.into()),
            loads: AtomicUsize::new(0),
        }
    }

    /// Replace the served document (e.g. with something malformed)
    pub fn set_json(&self, json: impl Into<String>) {
        *self.json.lock().unwrap() = json.into();
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnswerSource for MockAnswers {
    async fn load(&self) -> Result<AnswerTable, DataError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let json = self.json.lock().unwrap().clone();
        AnswerTable::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{SkillRuntime, Turn};
    use crate::state_machine::Event;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    const TABLE: &str = r#"{
        "Ore Range Chews": "orange juice",
        "Hop Eat Tall": "hospital",
        "Tooth Pace Tea": "toothpaste"
    }"#;

    type TestRuntime = SkillRuntime<Arc<InMemoryStore>, Arc<MockAnswers>>;

    fn runtime(store: &Arc<InMemoryStore>, answers: &Arc<MockAnswers>) -> TestRuntime {
        SkillRuntime::with_rng(store.clone(), answers.clone(), StdRng::seed_from_u64(17))
    }

    fn turn(session_id: &str, new_session: bool, event: Event) -> Turn {
        Turn {
            user_id: "user-1".to_string(),
            session_id: session_id.to_string(),
            new_session,
            event,
        }
    }

    fn answer_for(gibberish: &str) -> String {
        let table = AnswerTable::from_json(TABLE).unwrap();
        table.answers(gibberish).unwrap().iter().next().unwrap().clone()
    }

    #[tokio::test]
    async fn test_full_game_scenario() {
        let store = Arc::new(InMemoryStore::new());
        let answers = Arc::new(MockAnswers::new(TABLE));
        let rt = runtime(&store, &answers);

        let reply = rt.handle(turn("s1", true, Event::Launch)).await.unwrap();
        assert!(reply.speech_text.contains("You have played 0 times"));
        assert!(!reply.should_end_session);

        let reply = rt.handle(turn("s1", false, Event::Yes)).await.unwrap();
        let state = rt.session("s1").await.unwrap();
        assert!(state.is_playing);
        let g1 = state.current_gibberish.clone().unwrap();
        assert!(reply.speech_text.contains(&g1));
        assert_eq!(answers.load_count(), 1);

        let reply = rt
            .handle(turn("s1", false, Event::guess("repeat")))
            .await
            .unwrap();
        assert!(reply.speech_text.contains(&g1));
        assert_eq!(rt.session("s1").await.unwrap(), state);

        let reply = rt
            .handle(turn("s1", false, Event::guess(answer_for(&g1))))
            .await
            .unwrap();
        assert!(reply.speech_text.starts_with("Nice!"));
        let g2 = rt.session("s1").await.unwrap().current_gibberish.unwrap();
        assert_ne!(g1, g2);

        let reply = rt.handle(turn("s1", false, Event::Stop)).await.unwrap();
        assert_eq!(reply.speech_text, "Thanks for playing!!");
        assert!(reply.should_end_session);
        assert!(rt.session("s1").await.is_none());

        let persisted = store.persisted("user-1").unwrap();
        assert_eq!(persisted.games_played, 1);
        assert!(!persisted.is_playing);
    }

    #[tokio::test]
    async fn test_persisted_state_reloaded_on_launch() {
        let store = Arc::new(InMemoryStore::new());
        let answers = Arc::new(MockAnswers::new(TABLE));
        let rt = runtime(&store, &answers);

        rt.handle(turn("s1", true, Event::Launch)).await;
        rt.handle(turn("s1", false, Event::Yes)).await;
        rt.handle(turn("s1", false, Event::Stop)).await;

        // A fresh runtime stands in for a later invocation
        let rt = runtime(&store, &answers);
        let reply = rt.handle(turn("s2", true, Event::Launch)).await.unwrap();
        assert!(reply.speech_text.contains("You have played 1 times"));
        let state = rt.session("s2").await.unwrap();
        assert_eq!(state.games_played, 1);
        assert!(!state.is_playing);
    }

    #[tokio::test]
    async fn test_no_persists_and_ends_session() {
        let store = Arc::new(InMemoryStore::new().with_state("user-1", SessionState::idle(4)));
        let answers = Arc::new(MockAnswers::new(TABLE));
        let rt = runtime(&store, &answers);

        rt.handle(turn("s1", true, Event::Launch)).await;
        let reply = rt.handle(turn("s1", false, Event::No)).await.unwrap();

        assert_eq!(reply.speech_text, "Ok. See you next time!!");
        assert!(reply.should_end_session);
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.persisted("user-1"), Some(SessionState::idle(4)));
        assert!(rt.session("s1").await.is_none());
    }

    #[tokio::test]
    async fn test_save_failure_apologizes_and_keeps_session() {
        let store = Arc::new(InMemoryStore::new());
        let answers = Arc::new(MockAnswers::new(TABLE));
        let rt = runtime(&store, &answers);

        rt.handle(turn("s1", true, Event::Launch)).await;
        rt.handle(turn("s1", false, Event::Yes)).await;
        let before = rt.session("s1").await.unwrap();

        store.fail_saves(true);
        let reply = rt.handle(turn("s1", false, Event::Stop)).await.unwrap();
        assert_eq!(reply.speech_text, "Sorry, I can't understand that. Please say it again!!");
        assert_eq!(reply.reprompt_text.as_deref(), Some(reply.speech_text.as_str()));
        assert_eq!(rt.session("s1").await.unwrap(), before);
        assert!(store.persisted("user-1").is_none());

        // The next attempt goes through
        store.fail_saves(false);
        let reply = rt.handle(turn("s1", false, Event::Stop)).await.unwrap();
        assert!(reply.should_end_session);
        assert_eq!(store.persisted("user-1").unwrap().games_played, 1);
    }

    #[tokio::test]
    async fn test_bad_answer_file_apologizes_and_stays_idle() {
        let store = Arc::new(InMemoryStore::new());
        let answers = Arc::new(MockAnswers::new("{ broken"));
        let rt = runtime(&store, &answers);

        rt.handle(turn("s1", true, Event::Launch)).await;
        let reply = rt.handle(turn("s1", false, Event::Yes)).await.unwrap();
        assert!(reply.speech_text.starts_with("Sorry"));
        assert!(!rt.session("s1").await.unwrap().is_playing);

        answers.set_json(TABLE);
        rt.handle(turn("s1", false, Event::Yes)).await;
        assert!(rt.session("s1").await.unwrap().is_playing);
    }

    #[tokio::test]
    async fn test_load_failure_apologizes() {
        let store = Arc::new(InMemoryStore::new());
        store.fail_loads(true);
        let answers = Arc::new(MockAnswers::new(TABLE));
        let rt = runtime(&store, &answers);

        let reply = rt.handle(turn("s1", true, Event::Launch)).await.unwrap();
        assert!(reply.speech_text.starts_with("Sorry"));
        assert!(rt.session("s1").await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_persisted_state_apologizes() {
        let corrupt = SessionState {
            is_playing: true,
            ..SessionState::default()
        };
        let store = Arc::new(InMemoryStore::new().with_state("user-1", corrupt));
        let answers = Arc::new(MockAnswers::new(TABLE));
        let rt = runtime(&store, &answers);

        let reply = rt.handle(turn("s1", true, Event::Launch)).await.unwrap();
        assert!(reply.speech_text.starts_with("Sorry"));
    }

    #[tokio::test]
    async fn test_session_ended_is_silent_and_forgets_session() {
        let store = Arc::new(InMemoryStore::new());
        let answers = Arc::new(MockAnswers::new(TABLE));
        let rt = runtime(&store, &answers);

        rt.handle(turn("s1", true, Event::Launch)).await;
        rt.handle(turn("s1", false, Event::Yes)).await;
        let reply = rt
            .handle(turn(
                "s1",
                false,
                Event::SessionEnded {
                    reason: Some("EXCEEDED_MAX_REPROMPTS".to_string()),
                },
            ))
            .await;

        assert!(reply.is_none());
        assert!(rt.session("s1").await.is_none());
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_session_ended_skips_store_when_session_is_gone() {
        let store = Arc::new(InMemoryStore::new());
        store.fail_loads(true);
        let answers = Arc::new(MockAnswers::new(TABLE));
        let rt = runtime(&store, &answers);

        let reply = rt
            .handle(turn("gone", false, Event::SessionEnded { reason: None }))
            .await;

        assert!(reply.is_none());
        assert!(rt.session("gone").await.is_none());
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_session_ended_ignores_corrupt_stored_state() {
        let corrupt = SessionState {
            is_playing: true,
            ..SessionState::default()
        };
        let store = Arc::new(InMemoryStore::new().with_state("user-1", corrupt));
        let answers = Arc::new(MockAnswers::new(TABLE));
        let rt = runtime(&store, &answers);

        let reply = rt
            .handle(turn("gone", true, Event::SessionEnded { reason: None }))
            .await;
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_launch_mid_round_restarts_from_stored_state() {
        let store = Arc::new(InMemoryStore::new().with_state("user-1", SessionState::idle(3)));
        let answers = Arc::new(MockAnswers::new(TABLE));
        let rt = runtime(&store, &answers);

        rt.handle(turn("s1", true, Event::Launch)).await;
        rt.handle(turn("s1", false, Event::Yes)).await;
        assert!(rt.session("s1").await.unwrap().is_playing);

        // Launch without the new-session flag still reloads; the live round is dropped
        let reply = rt.handle(turn("s1", false, Event::Launch)).await.unwrap();
        assert!(reply.speech_text.contains("You have played 3 times"));
        assert_eq!(rt.session("s1").await.unwrap(), SessionState::idle(3));
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_stop_at_counter_limit_apologizes() {
        let store = Arc::new(InMemoryStore::new().with_state("user-1", SessionState::idle(u64::MAX)));
        let answers = Arc::new(MockAnswers::new(TABLE));
        let rt = runtime(&store, &answers);

        let reply = rt.handle(turn("s1", true, Event::Stop)).await.unwrap();
        assert!(reply.speech_text.starts_with("Sorry"));
        assert_eq!(store.save_count(), 0);
        assert_eq!(store.persisted("user-1"), Some(SessionState::idle(u64::MAX)));
    }

    #[tokio::test]
    async fn test_intent_without_launch_loads_from_store() {
        let store = Arc::new(InMemoryStore::new().with_state("user-1", SessionState::idle(2)));
        let answers = Arc::new(MockAnswers::new(TABLE));
        let rt = runtime(&store, &answers);

        let reply = rt.handle(turn("s9", true, Event::Stop)).await.unwrap();
        assert!(reply.should_end_session);
        assert_eq!(store.persisted("user-1").unwrap().games_played, 3);
    }

    #[tokio::test]
    async fn test_guess_while_idle_falls_back() {
        let store = Arc::new(InMemoryStore::new());
        let answers = Arc::new(MockAnswers::new(TABLE));
        let rt = runtime(&store, &answers);

        rt.handle(turn("s1", true, Event::Launch)).await;
        let before = rt.session("s1").await.unwrap();
        let reply = rt
            .handle(turn("s1", false, Event::guess("hospital")))
            .await
            .unwrap();

        assert!(reply.speech_text.ends_with("Would you like to play?"));
        assert_eq!(rt.session("s1").await.unwrap(), before);
        assert_eq!(answers.load_count(), 0);
    }
}
