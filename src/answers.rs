//! Answer table: gibberish phrases and the answers they stand for
//!
//! The table is static game content. It is loaded once per game from an
//! [`AnswerSource`] and drawn from without repetition until exhausted.

mod draw;
mod source;
mod table;

pub use draw::{draw_next, draw_pool_init};
pub use source::{AnswerSource, EmbeddedAnswers, FileAnswers};
pub use table::{AnswerTable, DataError};
pub(crate) use table::normalize;
