#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{ControllerError, SessionError};

pub use sessions::{
    Command, FeedbackView, Outcome, QuestionView, QuizController, QuizEvent, QuizPhase,
    QuizSession, QuizSettings, QuizView, ResultsView, Screen, SessionProgress, TickOutcome,
    Ticker, TopicEntry, summarize,
};
