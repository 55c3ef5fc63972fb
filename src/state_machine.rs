//! Core session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
mod reply;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::Event;
pub use reply::Reply;
pub use state::{SessionState, StateError};
pub use transition::{transition, TransitionError};
