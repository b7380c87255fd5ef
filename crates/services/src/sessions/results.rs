use chrono::{DateTime, Utc};
use quiz_core::model::{AnswerOutcome, QuizSummary};

use super::service::QuizSession;
use crate::error::SessionError;

/// Aggregate the graded answers of a session into a `QuizSummary`.
///
/// Works on unfinished sessions too: ungraded questions count toward the
/// overall total but not toward per-topic accuracy.
///
/// # Errors
///
/// Returns `SessionError::Summary` if `completed_at` is before the session start.
pub fn summarize(
    session: &QuizSession,
    completed_at: DateTime<Utc>,
) -> Result<QuizSummary, SessionError> {
    let outcomes: Vec<AnswerOutcome<'_>> = session
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| AnswerOutcome {
            topic: question.topic(),
            correct: session.grade_for(index),
        })
        .collect();

    Ok(QuizSummary::from_outcomes(
        session.started_at(),
        completed_at,
        &outcomes,
        session.total_time_used(),
    )?)
}
