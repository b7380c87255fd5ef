mod progress;
mod results;
mod service;
mod ticker;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use results::summarize;
pub use service::{QuizPhase, QuizSession, TickOutcome};
pub use ticker::Ticker;
pub use view::{FeedbackView, QuestionView, QuizView, ResultsView, TopicEntry};
pub use workflow::{Command, Outcome, QuizController, QuizEvent, QuizSettings, Screen};
