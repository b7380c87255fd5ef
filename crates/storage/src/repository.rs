use async_trait::async_trait;
use quiz_core::model::{Question, QuestionError, QuestionId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors raised while loading the question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("question source responded with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("question source is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("question {id} is invalid: {source}")]
    InvalidQuestion {
        id: String,
        #[source]
        source: QuestionError,
    },

    #[error("duplicate question id {0}")]
    DuplicateId(String),

    #[error("question source unavailable: {0}")]
    Unavailable(String),
}

/// Wire shape of one entry in the question source.
///
/// Mirrors the domain `Question` so sources can deserialize without
/// leaking the JSON layout into the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: String,
    pub topic: String,
    pub question: String,
    pub options: Vec<String>,
    pub answer_index: usize,
    #[serde(default)]
    pub explanation: String,
}

impl QuestionRecord {
    /// Convert the record into a validated domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidQuestion` when the record fails validation.
    pub fn into_question(self) -> Result<Question, LoadError> {
        let id = self.id;
        Question::new(
            QuestionId::new(id.clone()),
            self.topic,
            self.question,
            self.options,
            self.answer_index,
            self.explanation,
        )
        .map_err(|source| LoadError::InvalidQuestion { id, source })
    }
}

/// Anything the question bank can be read from.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Read every record from the source, in source order.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the source is unreachable or its content is malformed.
    async fn fetch(&self) -> Result<Vec<QuestionRecord>, LoadError>;

    /// Human readable location, used in logs.
    fn describe(&self) -> String;
}

/// In-memory source for tests and embedded banks.
///
/// Clones share state, so a test can keep a handle and change what the
/// next fetch returns.
#[derive(Clone, Default)]
pub struct InMemorySource {
    records: Arc<Mutex<Vec<QuestionRecord>>>,
    unavailable: Arc<Mutex<Option<String>>>,
}

impl InMemorySource {
    #[must_use]
    pub fn new(records: Vec<QuestionRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            unavailable: Arc::new(Mutex::new(None)),
        }
    }

    /// Make subsequent fetches fail with `LoadError::Unavailable(reason)`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Unavailable` if the internal lock is poisoned.
    pub fn set_unavailable(&self, reason: Option<String>) -> Result<(), LoadError> {
        let mut guard = self
            .unavailable
            .lock()
            .map_err(|e| LoadError::Unavailable(e.to_string()))?;
        *guard = reason;
        Ok(())
    }

    /// Replace the records returned by subsequent fetches.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Unavailable` if the internal lock is poisoned.
    pub fn replace(&self, records: Vec<QuestionRecord>) -> Result<(), LoadError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| LoadError::Unavailable(e.to_string()))?;
        *guard = records;
        Ok(())
    }
}

#[async_trait]
impl QuestionSource for InMemorySource {
    async fn fetch(&self) -> Result<Vec<QuestionRecord>, LoadError> {
        let reason = self
            .unavailable
            .lock()
            .map_err(|e| LoadError::Unavailable(e.to_string()))?
            .clone();
        if let Some(reason) = reason {
            return Err(LoadError::Unavailable(reason));
        }
        let guard = self
            .records
            .lock()
            .map_err(|e| LoadError::Unavailable(e.to_string()))?;
        Ok(guard.clone())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
