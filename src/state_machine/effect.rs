//! Effects produced by state transitions

/// Effects to be executed after state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Load the answer table; the runtime answers with `Event::AnswersLoaded`
    LoadAnswers,

    /// Persist the new state to the store
    PersistState,

    /// Forget the in-memory session
    EndSession,
}
