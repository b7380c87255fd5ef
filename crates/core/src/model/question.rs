use std::fmt;

use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("topic cannot be empty")]
    EmptyTopic,

    #[error("question text cannot be empty")]
    EmptyText,

    #[error("a question needs at least 2 options, got {len}")]
    TooFewOptions { len: usize },

    #[error("answer index {index} is out of range for {len} options")]
    AnswerOutOfRange { index: usize, len: usize },
}

//
// ─── DIFFICULTY ───────────────────────────────────────────────────────────────
//

/// Cosmetic difficulty label derived from the `Q<number>` id convention.
///
/// Never used for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Ids `Q1`..=`Q10` are easy, `Q11`..=`Q20` medium, anything above hard.
    /// Ids outside the convention fall back to medium.
    #[must_use]
    pub fn from_id(id: &QuestionId) -> Self {
        match id.number() {
            Some(n) if n <= 10 => Self::Easy,
            Some(n) if n <= 20 => Self::Medium,
            Some(_) => Self::Hard,
            None => Self::Medium,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    topic: String,
    text: String,
    options: Vec<String>,
    answer_index: usize,
    explanation: String,
}

impl Question {
    /// Builds a question, trimming the id, topic and text.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when a required field is empty, fewer than two
    /// options are given, or `answer_index` does not point at an option.
    pub fn new(
        id: QuestionId,
        topic: impl Into<String>,
        text: impl Into<String>,
        options: Vec<String>,
        answer_index: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        if id.is_empty() {
            return Err(QuestionError::EmptyId);
        }
        let topic = topic.into().trim().to_string();
        if topic.is_empty() {
            return Err(QuestionError::EmptyTopic);
        }
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions { len: options.len() });
        }
        if answer_index >= options.len() {
            return Err(QuestionError::AnswerOutOfRange {
                index: answer_index,
                len: options.len(),
            });
        }

        Ok(Self {
            id,
            topic,
            text,
            options,
            answer_index,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn answer_index(&self) -> usize {
        self.answer_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Returns true if `choice` is the correct option.
    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.answer_index
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_id(&self.id)
    }
}
