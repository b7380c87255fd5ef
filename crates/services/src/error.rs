//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::SummaryError;
use storage::LoadError;

use crate::sessions::QuizPhase;

/// Errors emitted by the quiz session state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("select an answer before submitting")]
    NoAnswerSelected,
    #[error("topic {topic:?} has no questions")]
    EmptyTopic { topic: String },
    #[error("option {index} does not exist, the question has {len} options")]
    OptionOutOfRange { index: usize, len: usize },
    #[error("cannot {action} while in {phase}")]
    InvalidState {
        action: &'static str,
        phase: QuizPhase,
    },
    #[error("no quiz in progress")]
    NoSession,
    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// Errors emitted by `QuizController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ControllerError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
