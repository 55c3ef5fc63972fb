//! Answer table type and parsing

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Errors raised while loading or drawing from the answer table
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Answer file not found: {0}")]
    NotFound(String),
    #[error("Failed to read answer file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed answer file: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Answer table is empty")]
    Empty,
    #[error("No accepted answers for gibberish: {0}")]
    NoAnswers(String),
}

/// One entry of the answer file: a single answer or a list of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AcceptedAnswers {
    One(String),
    Many(Vec<String>),
}

impl AcceptedAnswers {
    fn into_set(self) -> BTreeSet<String> {
        let answers = match self {
            AcceptedAnswers::One(answer) => vec![answer],
            AcceptedAnswers::Many(answers) => answers,
        };
        answers
            .iter()
            .map(String::as_str)
            .map(normalize)
            .filter(|a| !a.is_empty())
            .collect()
    }
}

/// Trim and lower-case a spoken phrase for comparison
pub(crate) fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Mapping from gibberish phrase to its accepted answers.
///
/// Never empty, and every phrase has at least one non-blank answer.
/// Answers are stored normalized so matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, AcceptedAnswers>",
    into = "BTreeMap<String, Vec<String>>"
)]
pub struct AnswerTable {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl AnswerTable {
    /// Parse the JSON answer file format
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let raw: BTreeMap<String, AcceptedAnswers> = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, gibberish: &str) -> bool {
        self.entries.contains_key(gibberish)
    }

    /// All gibberish phrases, in table order
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Accepted answers for a phrase
    #[allow(dead_code)] // Used in tests
    pub fn answers(&self, gibberish: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(gibberish)
    }

    /// Whether `guess` is an accepted answer for `gibberish`
    pub fn accepts(&self, gibberish: &str, guess: &str) -> bool {
        self.entries
            .get(gibberish)
            .is_some_and(|answers| answers.contains(&normalize(guess)))
    }
}

impl TryFrom<BTreeMap<String, AcceptedAnswers>> for AnswerTable {
    type Error = DataError;

    fn try_from(raw: BTreeMap<String, AcceptedAnswers>) -> Result<Self, Self::Error> {
        if raw.is_empty() {
            return Err(DataError::Empty);
        }

        let mut entries = BTreeMap::new();
        for (gibberish, accepted) in raw {
            let answers = accepted.into_set();
            if answers.is_empty() {
                return Err(DataError::NoAnswers(gibberish));
            }
            entries.insert(gibberish, answers);
        }

        Ok(Self { entries })
    }
}

impl From<AnswerTable> for BTreeMap<String, Vec<String>> {
    fn from(table: AnswerTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(gibberish, answers)| (gibberish, answers.into_iter().collect()))
            .collect()
    }
}
