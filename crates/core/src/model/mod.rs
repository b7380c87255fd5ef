mod ids;
mod question;
mod summary;
mod topic;

pub use ids::QuestionId;
pub use question::{Difficulty, Question, QuestionError};
pub use summary::{AnswerOutcome, QuizSummary, SummaryError, TopicAccuracy, accuracy_percent};
pub use topic::TopicIndex;
