use std::collections::HashSet;
use std::time::Instant;

use log::{info, warn};
use quiz_core::model::{Question, TopicIndex};

use crate::repository::{LoadError, QuestionRecord, QuestionSource};

/// The loaded question bank, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionStore {
    questions: Vec<Question>,
}

impl QuestionStore {
    /// A store with no questions, used when loading failed.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate records into a store.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidQuestion` for the first record that fails
    /// validation and `LoadError::DuplicateId` when two records share an id.
    pub fn from_records(records: Vec<QuestionRecord>) -> Result<Self, LoadError> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut questions = Vec::with_capacity(records.len());
        for record in records {
            let question = record.into_question()?;
            if !seen.insert(question.id().clone()) {
                return Err(LoadError::DuplicateId(question.id().to_string()));
            }
            questions.push(question);
        }
        Ok(Self { questions })
    }

    /// Fetch and validate the whole bank from `source`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` when the source is unreachable or malformed. The
    /// caller is expected to fall back to [`QuestionStore::empty`].
    pub async fn load(source: &dyn QuestionSource) -> Result<Self, LoadError> {
        let now = Instant::now();
        let store = match source.fetch().await {
            Ok(records) => Self::from_records(records),
            Err(err) => Err(err),
        }
        .inspect_err(|err| warn!("[Store] Failed to load {}: {err}", source.describe()))?;

        info!(
            "[Store] Loaded {} questions from {} in {} ms",
            store.len(),
            source.describe(),
            now.elapsed().as_millis()
        );
        Ok(store)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn topic_index(&self) -> TopicIndex<'_> {
        TopicIndex::new(&self.questions)
    }
}
