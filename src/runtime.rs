//! Runtime for executing skill turns
//!
//! Owns the injected collaborators, applies the effects produced by the
//! state machine, and keeps live sessions in memory between turns.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{SkillError, SkillRuntime, Turn};
pub use traits::*;

use crate::answers::{AnswerSource, AnswerTable, DataError, EmbeddedAnswers, FileAnswers};
use crate::db::Database;
use async_trait::async_trait;

/// Answer source chosen by configuration
pub enum ConfiguredAnswers {
    Bundled(EmbeddedAnswers),
    File(FileAnswers),
}

#[async_trait]
impl AnswerSource for ConfiguredAnswers {
    async fn load(&self) -> Result<AnswerTable, DataError> {
        match self {
            ConfiguredAnswers::Bundled(source) => source.load().await,
            ConfiguredAnswers::File(source) => source.load().await,
        }
    }
}

/// Type alias for production runtime with concrete implementations
pub type ProductionRuntime = SkillRuntime<Database, ConfiguredAnswers>;
