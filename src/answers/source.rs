//! Where answer tables come from

use super::{AnswerTable, DataError};
use async_trait::async_trait;
use rust_embed::Embed;
use std::path::PathBuf;
use std::sync::Arc;

/// Bundled game content
#[derive(Embed)]
#[folder = "data/"]
struct BundledData;

const BUNDLED_TABLE: &str = "pairings.json";

/// Provider of the answer table, consulted at the start of every game
#[async_trait]
pub trait AnswerSource: Send + Sync {
    async fn load(&self) -> Result<AnswerTable, DataError>;
}

#[async_trait]
impl<T: AnswerSource + ?Sized> AnswerSource for Arc<T> {
    async fn load(&self) -> Result<AnswerTable, DataError> {
        (**self).load().await
    }
}

/// The answer table compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedAnswers;

#[async_trait]
impl AnswerSource for EmbeddedAnswers {
    async fn load(&self) -> Result<AnswerTable, DataError> {
        let file = BundledData::get(BUNDLED_TABLE)
            .ok_or_else(|| DataError::NotFound(BUNDLED_TABLE.to_string()))?;
        let json = std::str::from_utf8(&file.data).map_err(|e| DataError::Io {
            path: BUNDLED_TABLE.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        AnswerTable::from_json(json)
    }
}

/// An answer file on disk, re-read for every game
#[derive(Debug, Clone)]
pub struct FileAnswers {
    path: PathBuf,
}

impl FileAnswers {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AnswerSource for FileAnswers {
    async fn load(&self) -> Result<AnswerTable, DataError> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => DataError::NotFound(self.path.display().to_string()),
                _ => DataError::Io {
                    path: self.path.display().to_string(),
                    source: e,
                },
            })?;
        AnswerTable::from_json(&json)
    }
}
